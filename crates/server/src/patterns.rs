use std::fmt;
use std::str::FromStr;

/// Message patterns served by the catalog. Each maps to one NATS subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pattern {
    CreateProduct,
    FindAllProducts,
    FindOneProduct,
    UpdateProduct,
    DeleteProduct,
}

impl Pattern {
    pub const ALL: [Pattern; 5] = [
        Pattern::CreateProduct,
        Pattern::FindAllProducts,
        Pattern::FindOneProduct,
        Pattern::UpdateProduct,
        Pattern::DeleteProduct,
    ];

    pub fn subject(self) -> &'static str {
        match self {
            Pattern::CreateProduct => "create_product",
            Pattern::FindAllProducts => "find_all_products",
            Pattern::FindOneProduct => "find_one_product",
            Pattern::UpdateProduct => "update_product",
            Pattern::DeleteProduct => "delete_product",
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.subject())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPattern(pub String);

impl FromStr for Pattern {
    type Err = UnknownPattern;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Pattern::ALL
            .into_iter()
            .find(|p| p.subject() == s)
            .ok_or_else(|| UnknownPattern(s.to_string()))
    }
}
