use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum LiteralType {
    None,
    Bool,
    Int,
    Float,
    String,
    BoolArray,
    IntArray,
    FloatArray,
    StringArray,
}

/// Constant value assigned to an input vertex.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Literal {
    #[default]
    None,
    Bool(bool),
    Int(i32),
    Float(f32),
    String(String),
    BoolArray(Vec<bool>),
    IntArray(Vec<i32>),
    FloatArray(Vec<f32>),
    StringArray(Vec<String>),
}

impl Literal {
    pub fn literal_type(&self) -> LiteralType {
        match self {
            Literal::None => LiteralType::None,
            Literal::Bool(_) => LiteralType::Bool,
            Literal::Int(_) => LiteralType::Int,
            Literal::Float(_) => LiteralType::Float,
            Literal::String(_) => LiteralType::String,
            Literal::BoolArray(_) => LiteralType::BoolArray,
            Literal::IntArray(_) => LiteralType::IntArray,
            Literal::FloatArray(_) => LiteralType::FloatArray,
            Literal::StringArray(_) => LiteralType::StringArray,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Literal::None)
    }
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Literal::Bool(value)
    }
}

impl From<i32> for Literal {
    fn from(value: i32) -> Self {
        Literal::Int(value)
    }
}

impl From<f32> for Literal {
    fn from(value: f32) -> Self {
        Literal::Float(value)
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::String(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_type() {
        assert_eq!(Literal::from(440.0f32).literal_type(), LiteralType::Float);
        assert_eq!(Literal::default().literal_type(), LiteralType::None);
        assert_eq!(
            Literal::IntArray(vec![1, 2]).literal_type(),
            LiteralType::IntArray
        );
    }

    #[test]
    fn test_literal_json_shape() {
        let json = serde_json::to_value(Literal::Float(0.5)).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "float", "value": 0.5 }));
    }
}
