/// Decides whether a feature identifier may appear in a filter.
/// Implementations must be free of side effects when shared.
pub trait FidValidator: Send + Sync {
    fn is_valid(&self, id: &str) -> bool;
}

/// Accepts every identifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAllFids;

impl FidValidator for AcceptAllFids {
    fn is_valid(&self, _id: &str) -> bool {
        true
    }
}

/// Accepts identifiers of the form `<type name>.<anything>`.
#[derive(Debug, Clone)]
pub struct PrefixFidValidator {
    prefix: String,
}

impl PrefixFidValidator {
    pub fn new(type_name: &str) -> Self {
        Self { prefix: format!("{}.", type_name) }
    }
}

impl FidValidator for PrefixFidValidator {
    fn is_valid(&self, id: &str) -> bool {
        id.len() > self.prefix.len() && id.starts_with(&self.prefix)
    }
}

/// Adapts a closure.
pub struct FnFidValidator<F>(pub F);

impl<F> FidValidator for FnFidValidator<F>
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn is_valid(&self, id: &str) -> bool {
        (self.0)(id)
    }
}
