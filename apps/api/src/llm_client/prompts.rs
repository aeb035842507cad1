// Prompt text sent to the completion service. Kept in Portuguese, the
// language of the résumés this service edits.

/// System prompt for rewriting the personal summary.
pub const IMPROVE_SUMMARY_SYSTEM: &str = "Você é um especialista em escrita de currículos. \
    Melhore esse resumo e corrija se houver erros, mantendo tom profissional e objetivo.";
