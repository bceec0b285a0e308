use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardBrand {
    Amex,
    Diners,
    Elo,
    Hipercard,
    Master,
    Visa,
}

impl CardBrand {
    /// Nome da bandeira como o gateway espera no campo `Brand`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Amex => "Amex",
            Self::Diners => "Diners",
            Self::Elo => "Elo",
            Self::Hipercard => "Hipercard",
            Self::Master => "Master",
            Self::Visa => "Visa",
        }
    }

    pub fn is_accepted(&self) -> bool {
        ACCEPTED_BRANDS.contains(&self.name())
    }
}

impl fmt::Display for CardBrand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Bandeiras aceitas pelo gateway.
pub const ACCEPTED_BRANDS: &[&str] = &[
    "Visa", "Master", "Amex", "Elo", "Aura", "JCB", "Diners", "Discover", "Hipercard", "Hiper",
];

const ELO_PATTERN: &str = concat!(
    r"^4011(78|79)|^43(1274|8935)|^45(1416|7393|763(1|2))",
    r"|^50(4175|6699|67[0-6][0-9]|677[0-8]|9[0-8][0-9]{2}|99[0-8][0-9]|999[0-9])",
    r"|^627780|^63(6297|6368|6369)",
    r"|^65(0(0(3([1-3]|[5-9])|4([0-9])|5[0-1])|4(0[5-9]|[1-3][0-9]|8[5-9]|9[0-9])",
    r"|5([0-2][0-9]|3[0-8]|4[1-9]|[5-8][0-9]|9[0-8])|7(0[0-9]|1[0-8]|2[0-7])",
    r"|9(0[1-9]|[1-6][0-9]|7[0-8]))|16(5[2-9]|[6-7][0-9])|50(0[0-9]|1[0-9]|2[1-9]|[3-4][0-9]|5[0-8]))",
);

// A ordem importa: alguns padrões se sobrepõem e vence o primeiro.
static RULES: Lazy<Vec<(CardBrand, Regex)>> = Lazy::new(|| {
    [
        (CardBrand::Amex, r"^3[47]\d{13}$"),
        (CardBrand::Diners, r"^3(?:0[0-5]|[68]\d)\d{11}$"),
        (CardBrand::Elo, ELO_PATTERN),
        (CardBrand::Hipercard, r"^(606282\d{10}(\d{3})?)|(3841\d{15})$"),
        (
            CardBrand::Master,
            r"^5[1-5]\d{14}$|^2(?:2(?:2[1-9]|[3-9]\d)|[3-6]\d\d|7(?:[01]\d|20))\d{12}$",
        ),
        (CardBrand::Visa, r"^4\d{12}(?:\d{3})?$"),
    ]
    .into_iter()
    .map(|(brand, pattern)| (brand, Regex::new(pattern).expect("valid card brand pattern")))
    .collect()
});

/// Descobre a bandeira do cartão pelo número (somente dígitos).
pub fn classify(card_number: &str) -> Option<CardBrand> {
    RULES
        .iter()
        .find(|(_, pattern)| pattern.is_match(card_number))
        .map(|(brand, _)| *brand)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_known_brands() {
        assert_eq!(classify("4111111111111111"), Some(CardBrand::Visa));
        assert_eq!(classify("4111111111111"), Some(CardBrand::Visa));
        assert_eq!(classify("341111111111111"), Some(CardBrand::Amex));
        assert_eq!(classify("371449635398431"), Some(CardBrand::Amex));
        assert_eq!(classify("30569309025904"), Some(CardBrand::Diners));
        assert_eq!(classify("5555555555554444"), Some(CardBrand::Master));
        assert_eq!(classify("2223000048400011"), Some(CardBrand::Master));
        assert_eq!(classify("6062825624254001"), Some(CardBrand::Hipercard));
        assert_eq!(classify("6362970000457013"), Some(CardBrand::Elo));
    }

    #[test]
    fn test_classify_unknown() {
        assert_eq!(classify("0000000000000000"), None);
        assert_eq!(classify(""), None);
        assert_eq!(classify("4111"), None);
    }

    #[test]
    fn test_elo_wins_over_visa() {
        // Prefixo 438935 é Elo, mesmo tendo formato de Visa.
        assert_eq!(classify("4389350000000000"), Some(CardBrand::Elo));
        assert_eq!(classify("4011780000000000"), Some(CardBrand::Elo));
    }

    #[test]
    fn test_accepted_brands() {
        for brand in [
            CardBrand::Amex,
            CardBrand::Diners,
            CardBrand::Elo,
            CardBrand::Hipercard,
            CardBrand::Master,
            CardBrand::Visa,
        ] {
            assert!(brand.is_accepted(), "{} should be accepted", brand);
        }
        assert_eq!(CardBrand::Master.to_string(), "Master");
    }
}
