//! Activity normalization
//!
//! The `ATIVIDADES` column holds pipe-delimited free text such as
//! `ART 123 | Obra | 18.1 - Elevadores de passageiros, [obs] |`. The third
//! segment names the inspected activity (TOS, tipo de obra/serviço); the
//! functions here reduce it to a label that groups well.

use regex::Regex;
use std::sync::LazyLock;

static DASH_DE_OR_PUNCT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(-\s*de|\.|-)").expect("valid punctuation pattern"));
static BRACKETED_TAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*\[.*\]*").expect("valid bracket pattern"));
static DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]").expect("valid digit pattern"));

const PASSENGER_MARKER: &str = "passageiros";
const NAVAL_CODE: &str = "18.1";
const NAVAL_PREFIX: &str = "Arquitetura Naval de Navio de ";
const ELEVATOR_PREFIX: &str = "Transportadores e Elevadores de ";

/// Remove every ASCII digit.
pub fn remove_digits(text: &str) -> String {
    DIGITS.replace_all(text, "").into_owned()
}

/// Passenger activities are ambiguous on their own ("de passageiros" is both
/// a ship and an elevator), so they get the discipline prefixed.
pub fn specialize_passenger_activity(text: &str) -> String {
    if !text.contains(PASSENGER_MARKER) {
        return text.to_string();
    }
    if text.contains(NAVAL_CODE) {
        format!("{NAVAL_PREFIX}{text}")
    } else {
        format!("{ELEVATOR_PREFIX}{text}")
    }
}

/// Extract the inspected activity from a raw `ATIVIDADES` field.
///
/// Returns `None` when the field has fewer than three `|`-separated segments.
pub fn cut_tos(field: &str) -> Option<String> {
    let segment = field.split('|').nth(2)?;
    let cleaned = DASH_DE_OR_PUNCT.replace_all(segment, "");
    let mut cleaned = BRACKETED_TAIL.replace_all(&cleaned, "").into_owned();
    // Last character goes unconditionally, even when it is not a separator
    cleaned.pop();
    Some(remove_digits(&specialize_passenger_activity(&cleaned)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_digits() {
        assert_eq!(remove_digits("NR 12 Máquinas 2024"), "NR  Máquinas ");
        assert_eq!(remove_digits("sem números"), "sem números");
    }

    #[test]
    fn test_specialize_plain_activity_unchanged() {
        assert_eq!(specialize_passenger_activity("Obras civis"), "Obras civis");
    }

    #[test]
    fn test_specialize_naval_passenger_activity() {
        assert_eq!(
            specialize_passenger_activity("18.1 Transporte de passageiros"),
            "Arquitetura Naval de Navio de 18.1 Transporte de passageiros"
        );
    }

    #[test]
    fn test_specialize_elevator_passenger_activity() {
        assert_eq!(
            specialize_passenger_activity("Elevadores de passageiros"),
            "Transportadores e Elevadores de Elevadores de passageiros"
        );
    }

    #[test]
    fn test_cut_tos_takes_third_segment() {
        let field = "ART 1420220001 | Execução | Instalações elétricas |";
        assert_eq!(cut_tos(field).as_deref(), Some(" Instalações elétricas"));
    }

    #[test]
    fn test_cut_tos_strips_dashes_dots_and_dash_de() {
        let field = "a|b|Proj. - de Estrutura-Metálica |";
        assert_eq!(cut_tos(field).as_deref(), Some("Proj  EstruturaMetálica"));
    }

    #[test]
    fn test_cut_tos_drops_bracketed_tail() {
        let field = "a|b|Fundações, [obra 12] extra|c";
        // Everything from ", [" is removed, then the last character goes
        assert_eq!(cut_tos(field).as_deref(), Some("Fundaçõe"));
    }

    #[test]
    fn test_cut_tos_removes_digits_last() {
        let field = "a|b| 7.2 Pavimentação |";
        assert_eq!(cut_tos(field).as_deref(), Some("  Pavimentação"));
    }

    #[test]
    fn test_cut_tos_dotted_code_is_gone_before_specialization() {
        // Dots are stripped first, so "18.1" never survives to pick the naval prefix
        let field = "x|y| 18.1 - de passageiros |";
        assert_eq!(
            cut_tos(field).as_deref(),
            Some("Transportadores e Elevadores de    passageiros")
        );
    }

    #[test]
    fn test_cut_tos_short_field_is_unclassified() {
        assert_eq!(cut_tos("somente|dois"), None);
        assert_eq!(cut_tos(""), None);
    }

    #[test]
    fn test_cut_tos_empty_segment_stays_empty() {
        assert_eq!(cut_tos("a|b||d").as_deref(), Some(""));
    }

    #[test]
    fn test_cut_tos_drops_multibyte_last_char() {
        assert_eq!(cut_tos("a|b|Serviç|").as_deref(), Some("Servi"));
    }
}
