use std::borrow::Cow;

use crate::parser::ast::{
    Between, Comparison, Expression, Function, Like, Predicate, SpatialBinary, SpatialDistance, TemporalBinary,
};

/// Tree rewriting protocol shared by every visitor.
///
/// Both handlers default to [`walk_predicate`] / [`walk_expression`], which
/// visit the children first and rebuild the node only when a child changed.
/// An untouched subtree comes back as `Cow::Borrowed`, so a visitor that
/// changes nothing returns the very tree it was given.
///
/// Implementors override a handler, match the variants they care about and
/// hand everything else back to the walk function.
pub trait FilterVisitor {
    type Error;

    fn visit_predicate<'a>(&mut self, predicate: &'a Predicate) -> Result<Cow<'a, Predicate>, Self::Error> {
        walk_predicate(self, predicate)
    }

    fn visit_expression<'a>(&mut self, expression: &'a Expression) -> Result<Cow<'a, Expression>, Self::Error> {
        walk_expression(self, expression)
    }
}

fn is_owned<T: Clone>(value: &Cow<'_, T>) -> bool {
    matches!(value, Cow::Owned(_))
}

fn walk_predicates<'a, V: FilterVisitor + ?Sized>(
    visitor: &mut V,
    items: &'a [Predicate],
) -> Result<Option<Vec<Predicate>>, V::Error> {
    let visited = items
        .iter()
        .map(|item| visitor.visit_predicate(item))
        .collect::<Result<Vec<_>, _>>()?;

    if !visited.iter().any(is_owned) {
        return Ok(None);
    }
    Ok(Some(visited.into_iter().map(Cow::into_owned).collect()))
}

fn walk_expressions<'a, V: FilterVisitor + ?Sized>(
    visitor: &mut V,
    items: &'a [Expression],
) -> Result<Option<Vec<Expression>>, V::Error> {
    let visited = items
        .iter()
        .map(|item| visitor.visit_expression(item))
        .collect::<Result<Vec<_>, _>>()?;

    if !visited.iter().any(is_owned) {
        return Ok(None);
    }
    Ok(Some(visited.into_iter().map(Cow::into_owned).collect()))
}

/// Visits every child of `predicate` and rebuilds it if any child changed.
pub fn walk_predicate<'a, V: FilterVisitor + ?Sized>(
    visitor: &mut V,
    predicate: &'a Predicate,
) -> Result<Cow<'a, Predicate>, V::Error> {
    let rebuilt = match predicate {
        Predicate::Include | Predicate::Exclude | Predicate::ResourceId(_) => None,
        Predicate::And(items) => walk_predicates(visitor, items)?.map(Predicate::And),
        Predicate::Or(items) => walk_predicates(visitor, items)?.map(Predicate::Or),
        Predicate::Not(inner) => match visitor.visit_predicate(inner)? {
            Cow::Borrowed(_) => None,
            Cow::Owned(inner) => Some(Predicate::Not(Box::new(inner))),
        },
        Predicate::Comparison(cmp) => {
            let left = visitor.visit_expression(&cmp.left)?;
            let right = visitor.visit_expression(&cmp.right)?;
            (is_owned(&left) || is_owned(&right)).then(|| {
                Predicate::Comparison(Comparison {
                    op: cmp.op,
                    left: left.into_owned(),
                    right: right.into_owned(),
                    match_case: cmp.match_case,
                    swapped: cmp.swapped,
                })
            })
        }
        Predicate::Between(between) => {
            let expr = visitor.visit_expression(&between.expr)?;
            let lower = visitor.visit_expression(&between.lower)?;
            let upper = visitor.visit_expression(&between.upper)?;
            (is_owned(&expr) || is_owned(&lower) || is_owned(&upper)).then(|| {
                Predicate::Between(Between {
                    expr: expr.into_owned(),
                    lower: lower.into_owned(),
                    upper: upper.into_owned(),
                })
            })
        }
        Predicate::Like(like) => match visitor.visit_expression(&like.expr)? {
            Cow::Borrowed(_) => None,
            Cow::Owned(expr) => Some(Predicate::Like(Like {
                expr,
                pattern: like.pattern.clone(),
                ..*like
            })),
        },
        Predicate::IsNull(expr) => match visitor.visit_expression(expr)? {
            Cow::Borrowed(_) => None,
            Cow::Owned(expr) => Some(Predicate::IsNull(expr)),
        },
        Predicate::IsNil(expr) => match visitor.visit_expression(expr)? {
            Cow::Borrowed(_) => None,
            Cow::Owned(expr) => Some(Predicate::IsNil(expr)),
        },
        Predicate::Spatial(spatial) => {
            let property = visitor.visit_expression(&spatial.property)?;
            let geometry = visitor.visit_expression(&spatial.geometry)?;
            (is_owned(&property) || is_owned(&geometry)).then(|| {
                Predicate::Spatial(SpatialBinary {
                    op: spatial.op,
                    property: property.into_owned(),
                    geometry: geometry.into_owned(),
                    swapped: spatial.swapped,
                    loose: spatial.loose,
                })
            })
        }
        Predicate::Distance(distance) => {
            let property = visitor.visit_expression(&distance.property)?;
            let geometry = visitor.visit_expression(&distance.geometry)?;
            (is_owned(&property) || is_owned(&geometry)).then(|| {
                Predicate::Distance(SpatialDistance {
                    op: distance.op,
                    property: property.into_owned(),
                    geometry: geometry.into_owned(),
                    distance: distance.distance,
                    unit: distance.unit.clone(),
                    swapped: distance.swapped,
                })
            })
        }
        Predicate::Temporal(temporal) => {
            let property = visitor.visit_expression(&temporal.property)?;
            let operand = visitor.visit_expression(&temporal.operand)?;
            (is_owned(&property) || is_owned(&operand)).then(|| {
                Predicate::Temporal(TemporalBinary {
                    op: temporal.op,
                    property: property.into_owned(),
                    operand: operand.into_owned(),
                })
            })
        }
    };

    Ok(rebuilt.map_or(Cow::Borrowed(predicate), Cow::Owned))
}

/// Visits every child of `expression` and rebuilds it if any child changed.
pub fn walk_expression<'a, V: FilterVisitor + ?Sized>(
    visitor: &mut V,
    expression: &'a Expression,
) -> Result<Cow<'a, Expression>, V::Error> {
    let rebuilt = match expression {
        Expression::Property(_) | Expression::Literal(_) => None,
        Expression::Arithmetic { op, left, right } => {
            let l = visitor.visit_expression(left)?;
            let r = visitor.visit_expression(right)?;
            (is_owned(&l) || is_owned(&r)).then(|| Expression::arithmetic(*op, l.into_owned(), r.into_owned()))
        }
        Expression::Function(fun) => walk_expressions(visitor, &fun.args)?
            .map(|args| Expression::Function(Function { name: fun.name.clone(), args })),
    };

    Ok(rebuilt.map_or(Cow::Borrowed(expression), Cow::Owned))
}

/// Runs a visitor that cannot fail.
pub fn apply<'a, V>(visitor: &mut V, predicate: &'a Predicate) -> Cow<'a, Predicate>
where
    V: FilterVisitor<Error = std::convert::Infallible> + ?Sized,
{
    match visitor.visit_predicate(predicate) {
        Ok(result) => result,
        Err(never) => match never {},
    }
}
