use std::{borrow::Cow, convert::Infallible};

use tracing::trace;

use crate::{
    parser::ast::{Expression, Predicate, Value},
    visitor::{apply, walk_expression, walk_predicate, AcceptAllFids, FidValidator, FilterVisitor, LiteralResolver},
};

/// Constant folding and logical identity elimination.
///
/// Rules run bottom-up, so a node's rule sees already simplified children:
///
/// * `And`: any `Exclude` collapses the node, `Include` children are dropped,
///   no child left gives `Include`, a single child is unwrapped.
/// * `Or`: the mirror image with `Include` and `Exclude` exchanged.
/// * `Not` over `Include`/`Exclude`/`Not` is removed.
/// * comparisons, `BETWEEN`, `LIKE` and null checks over literals are
///   evaluated; arithmetic over numeric literals is computed.
/// * a `ResourceId` rejected by the FID validator becomes `Exclude`.
pub struct Simplifier {
    fid_validator: Box<dyn FidValidator>,
}

impl Default for Simplifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Simplifier {
    pub fn new() -> Self {
        Self { fid_validator: Box::new(AcceptAllFids) }
    }

    pub fn with_fid_validator(fid_validator: impl FidValidator + 'static) -> Self {
        Self { fid_validator: Box::new(fid_validator) }
    }

    pub fn simplify(&mut self, predicate: &Predicate) -> Predicate {
        apply(self, predicate).into_owned()
    }

    fn truth(value: bool) -> Predicate {
        if value { Predicate::Include } else { Predicate::Exclude }
    }

    /// Rule for a node whose children are already simplified. `None` keeps
    /// the node as it is.
    fn rule(&self, predicate: &Predicate) -> Option<Predicate> {
        match predicate {
            Predicate::And(items) => Self::junction(items, Predicate::Exclude, Predicate::Include, Predicate::And),
            Predicate::Or(items) => Self::junction(items, Predicate::Include, Predicate::Exclude, Predicate::Or),
            Predicate::Not(inner) => match inner.as_ref() {
                Predicate::Include => Some(Predicate::Exclude),
                Predicate::Exclude => Some(Predicate::Include),
                Predicate::Not(p) => Some(p.as_ref().clone()),
                _ => None,
            },
            Predicate::ResourceId(rid) if !self.fid_validator.is_valid(&rid.id) => {
                trace!(id = %rid.id, "feature id rejected");
                Some(Predicate::Exclude)
            }
            Predicate::Comparison(cmp) => {
                let (l, r) = (cmp.left.as_literal()?, cmp.right.as_literal()?);
                LiteralResolver::eval_compare(l, cmp.op, r, cmp.match_case).map(Self::truth)
            }
            Predicate::Between(between) => {
                let value = between.expr.as_literal()?;
                let (lower, upper) = (between.lower.as_literal()?, between.upper.as_literal()?);
                LiteralResolver::eval_between(value, lower, upper).map(Self::truth)
            }
            Predicate::Like(like) => match like.expr.as_literal()? {
                Value::Text(text) => LiteralResolver::eval_like(text, like).map(Self::truth),
                _ => None,
            },
            Predicate::IsNull(expr) | Predicate::IsNil(expr) => expr.as_literal().map(|_| Predicate::Exclude),
            _ => None,
        }
    }

    fn junction(
        items: &[Predicate],
        absorbing: Predicate,
        neutral: Predicate,
        build: fn(Vec<Predicate>) -> Predicate,
    ) -> Option<Predicate> {
        if items.contains(&absorbing) {
            return Some(absorbing);
        }

        let mut kept: Vec<Predicate> = items.iter().filter(|p| **p != neutral).cloned().collect();
        if kept.len() == items.len() && kept.len() > 1 {
            return None;
        }

        Some(match kept.len() {
            0 => neutral,
            1 => kept.remove(0),
            _ => build(kept),
        })
    }
}

impl FilterVisitor for Simplifier {
    type Error = Infallible;

    fn visit_predicate<'a>(&mut self, predicate: &'a Predicate) -> Result<Cow<'a, Predicate>, Infallible> {
        let walked = walk_predicate(self, predicate)?;
        match self.rule(walked.as_ref()) {
            Some(simplified) => {
                trace!(from = %walked, to = %simplified, "simplified");
                Ok(Cow::Owned(simplified))
            }
            None => Ok(walked),
        }
    }

    fn visit_expression<'a>(&mut self, expression: &'a Expression) -> Result<Cow<'a, Expression>, Infallible> {
        let walked = walk_expression(self, expression)?;
        if let Expression::Arithmetic { op, left, right } = walked.as_ref() {
            if let (Some(l), Some(r)) = (left.as_literal(), right.as_literal()) {
                if let Some(value) = LiteralResolver::eval_arithmetic(*op, l, r) {
                    return Ok(Cow::Owned(Expression::Literal(value)));
                }
            }
        }
        Ok(walked)
    }
}

/// Simplifies with the accept-all FID validator.
pub fn simplify(predicate: &Predicate) -> Predicate {
    Simplifier::new().simplify(predicate)
}
