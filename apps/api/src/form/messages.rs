// User-facing validation messages (pt-BR, as shown next to each input).

pub const REQUIRED: &str = "Campo obrigatório";
pub const MIN_TWO_CHARS: &str = "Mínimo de 2 caracteres";

pub const START_DATE_REQUIRED: &str = "Informe a data de início";
pub const INVALID_DATE: &str = "Informe uma data válida";
pub const START_AFTER_END: &str = "Início deve ser anterior ao fim";
pub const END_BEFORE_START: &str = "Fim deve ser posterior ao início";
pub const END_DATE_WITH_CURRENT_JOB: &str =
    "Não deve preencher a data de fim se este for seu trabalho atual";
pub const CLEAR_END_DATE_FIRST: &str = "Limpe a data de fim para marcar como seu trabalho atual";

pub const INVALID_EMAIL: &str = "Digite um e-mail válido";
pub const INVALID_PHONE: &str = "Telefone deve ter 10 ou 11 dígitos";
pub const LINKEDIN_REQUIRED: &str =
    "Informar o linkedin é importante para que os recrutadores analisem o seu perfil";
pub const INVALID_URL: &str = "Digite uma URL válida";
pub const SUMMARY_REQUIRED: &str =
    "Use o campo como uma carta de apresentação. Fale sobre você, seus aprendizados e experiências";
pub const SUMMARY_TOO_LONG: &str = "O resumo deve ter no máximo 500 caracteres";

const MIN_CHARS: usize = 2;

/// Shared "required, at least two characters" rule.
pub fn required_min_chars(value: &str) -> Option<String> {
    if value.is_empty() {
        Some(REQUIRED.to_string())
    } else if value.chars().count() < MIN_CHARS {
        Some(MIN_TWO_CHARS.to_string())
    } else {
        None
    }
}
