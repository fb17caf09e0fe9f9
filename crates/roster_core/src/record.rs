/// Shown in place of a missing field.
pub const PLACEHOLDER: &str = "-";

/// One scraped professor entry. Every field is optional.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Record {
    pub name: Option<String>,
    pub email: Option<String>,
    pub department: Option<String>,
}

impl Record {
    pub fn new(
        name: Option<String>,
        email: Option<String>,
        department: Option<String>,
    ) -> Self {
        Self {
            name,
            email,
            department,
        }
    }
}
