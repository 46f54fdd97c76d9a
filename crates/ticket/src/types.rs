use strum::{AsRefStr, Display, EnumString, VariantArray};

#[derive(
    EnumString, VariantArray, Display, AsRefStr, Clone, Copy, Debug, Default, PartialEq, Eq,
)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(
    EnumString, VariantArray, Display, AsRefStr, Clone, Copy, Debug, Default, PartialEq, Eq,
)]
pub enum Status {
    #[default]
    Open,
    Closed,
}
