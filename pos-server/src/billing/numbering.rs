//! Document numbering (VEN / CON / FAC) and NCF formatting

/// Numbered document kinds, one counter each in `document_sequence`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Sale,
    Conduce,
    Invoice,
}

impl DocumentKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Sale => "VEN",
            Self::Conduce => "CON",
            Self::Invoice => "FAC",
        }
    }
}

/// `VEN-000001`
pub fn format_number(kind: DocumentKind, seq: i64) -> String {
    format!("{}-{:06}", kind.prefix(), seq)
}

/// `B0100000001`
pub fn format_ncf(prefix: &str, seq: i64) -> String {
    format!("{}{:08}", prefix.trim().to_uppercase(), seq)
}
