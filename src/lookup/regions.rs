/// Regional do conselho: número da região, UF e nome por extenso.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionEntry {
    pub id: u32,
    pub state_code: &'static str,
    pub full_name: &'static str,
}

const fn region(id: u32, state_code: &'static str, full_name: &'static str) -> RegionEntry {
    RegionEntry {
        id,
        state_code,
        full_name,
    }
}

/// Região 10 não existe; 0 é o ambiente de homologação.
pub const REGIONS: &[RegionEntry] = &[
    region(0, "XX", "Homologacao"),
    region(1, "RJ", "Rio de Janeiro"),
    region(2, "SP", "São Paulo"),
    region(3, "RS", "Rio Grande do Sul"),
    region(4, "MG", "Minas Gerais"),
    region(5, "GO", "Goiás"),
    region(6, "PR", "Paraná"),
    region(7, "PE", "Pernambuco"),
    region(8, "DF", "Distrito Federal"),
    region(9, "BA", "Bahia"),
    region(11, "SC", "Santa Catarina"),
    region(12, "PA", "Pará & Amapá"),
    region(13, "ES", "Espírito Santo"),
    region(14, "MS", "Mato Grosso do Sul"),
    region(15, "CE", "Ceará"),
    region(16, "SE", "Sergipe"),
    region(17, "RN", "Rio Grande do Norte"),
    region(18, "AM", "Amazonas & Roraima"),
    region(19, "MT", "Mato Grosso"),
    region(20, "MA", "Maranhão"),
    region(21, "PB", "Paraíba"),
    region(22, "AL", "Alagoas"),
    region(23, "PI", "Piauí"),
    region(24, "RO", "Rondônia"),
    region(25, "TO", "Tocantins"),
    region(26, "AC", "Acre"),
    region(27, "RR", "Roraima"),
];

pub fn find(id: u32) -> Option<&'static RegionEntry> {
    REGIONS.iter().find(|r| r.id == id)
}

/// UF da região em caixa baixa, ex. `2 -> "sp"`.
pub fn id_to_state_code(id: u32) -> Option<String> {
    find(id).map(|r| r.state_code.to_lowercase())
}

pub fn id_to_state_code_upper(id: u32) -> Option<String> {
    find(id).map(|r| r.state_code.to_uppercase())
}

/// Nome do estado por extenso.
pub fn id_to_state_name(id: u32, upper: bool) -> Option<String> {
    find(id).map(|r| {
        if upper {
            r.full_name.to_uppercase()
        } else {
            r.full_name.to_lowercase()
        }
    })
}

/// Número da região a partir da UF (dois caracteres, qualquer caixa).
pub fn state_code_to_id(state_code: &str) -> Option<u32> {
    if state_code.chars().count() != 2 {
        return None;
    }
    let state_code = state_code.to_uppercase();
    REGIONS
        .iter()
        .find(|r| r.state_code == state_code)
        .map(|r| r.id)
}
