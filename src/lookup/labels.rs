// Textos de exibição para códigos do cadastro

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistrationStatus {
    pub id: i32,
    pub color: &'static str,
    pub label: &'static str,
}

const RED: &str = "#FF0000";

pub const REGISTRATION_STATUSES: &[RegistrationStatus] = &[
    RegistrationStatus { id: 1, color: "#008000", label: "ATIVO" },
    RegistrationStatus { id: 2, color: RED, label: "CANCELADO" },
    RegistrationStatus { id: 3, color: RED, label: "CANCELADO PUNITIVAMENTE" },
    RegistrationStatus { id: 4, color: RED, label: "CANCELADO POR DÉBITO" },
    RegistrationStatus { id: 5, color: RED, label: "SUSPENSO" },
    RegistrationStatus { id: 6, color: RED, label: "SUSPENSO PUNITIVAMENTE" },
    RegistrationStatus { id: 7, color: "#0000FF", label: "TRANSFERIDO" },
    RegistrationStatus { id: 8, color: RED, label: "FALECIDO" },
    RegistrationStatus { id: 9, color: RED, label: "CANCELADO A PEDIDO R.T." },
    RegistrationStatus { id: 10, color: RED, label: "SUSPENSO POR DÉBITO" },
    RegistrationStatus { id: 11, color: RED, label: "CANCELADO POR ATO ADMINISTRATIVO" },
    RegistrationStatus { id: 12, color: RED, label: "ARQUIVADO" },
];

pub const UNKNOWN_STATUS_LABEL: &str = "SITUAÇÃO CADASTRAL INDEFINIDA";

pub fn registration_status(id: i32) -> Option<&'static RegistrationStatus> {
    REGISTRATION_STATUSES.iter().find(|s| s.id == id)
}

/// Texto da situação cadastral, ou `UNKNOWN_STATUS_LABEL` se o código não existir.
pub fn status_label(id: i32) -> &'static str {
    registration_status(id).map_or(UNKNOWN_STATUS_LABEL, |s| s.label)
}

pub fn status_color(id: i32) -> Option<&'static str> {
    registration_status(id).map(|s| s.color)
}

pub fn phone_type_label(id: i32) -> &'static str {
    match id {
        1 => "Residencial",
        2 => "Comercial",
        3 => "Fax Residencial",
        4 => "Fax Comercial",
        5 => "Celular",
        _ => "",
    }
}

/// Formação do corretor (`idEscolaHabilitacao` na ficha cadastral).
pub fn education_label(id: i32) -> &'static str {
    match id {
        1 => "CIÊNCIAS IMOBILIÁRIAS",
        2 => "CORRETOR DE IMÓVEIS",
        3 => "GESTÃO DE NEGÓCIOS IMOBILIÁRIOS",
        4 => "SUPERIOR DE FORMAÇÃO ESP CIÊNCIAS IMOBILIÁRIAS",
        5 => "TÉCNICO EM TRANSAÇÕES IMOBILIÁRIAS",
        6 => "TECNÓLOGO EM TRANSAÇÕES IMOBILIÁRIAS",
        7 => "SUPERIOR DE FORMAÇÃO ESP GESTÃO IMOBILIÁRIA",
        8 => "GESTÃO IMOBILIÁRIA",
        9 => "SUPERIOR DE TECNOLOGIA EM NEGÓCIOS IMOBILIÁRIOS",
        _ => "",
    }
}
