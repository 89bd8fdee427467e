use hyformal::{node::NodeType, types::Type};
use strum::EnumIs;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, EnumIs, Error)]
pub enum CnfError {
    /// The formula contains a construct that has no clausal encoding (quantifiers).
    #[error("Cannot convert `{formula}` to CNF: `{kind}` is not supported.")]
    UnsupportedConstruct { kind: NodeType, formula: String },

    /// The root of the conversion is a theory term rather than a Boolean formula.
    #[error("Formula `{formula}` of type `{ty}` is a theory term and has no clausal form.")]
    NonBooleanFormula { formula: String, ty: Type },

    /// Building a literal or the output formula failed in the formula manager.
    #[error(transparent)]
    Formula(#[from] hyformal::Error),
}

pub type CnfResult<T> = Result<T, CnfError>;
