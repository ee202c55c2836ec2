use std::fmt;

use quarry_core::Value;

use super::{CompoundType, ScalarOp, ScalarOperator};

impl fmt::Display for ScalarOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let children = self.children();
        match self.op() {
            ScalarOp::Constant(value) => match value {
                Value::Varchar(_) | Value::Date(_) | Value::DateTime(_) => write!(f, "'{value}'"),
                _ => write!(f, "{value}"),
            },
            ScalarOp::ColumnRef(column) => write!(f, "{column}"),
            ScalarOp::Call(call) => {
                write!(f, "{}(", call.fn_name)?;
                write_list(f, children)?;
                write!(f, ")")
            }
            ScalarOp::BinaryPredicate(op) => {
                write_operand(f, &children[0])?;
                write!(f, " {op} ")?;
                write_operand(f, &children[1])
            }
            ScalarOp::CompoundPredicate(CompoundType::Not) => {
                write!(f, "NOT ")?;
                write_operand(f, &children[0])
            }
            ScalarOp::CompoundPredicate(op) => {
                write_operand(f, &children[0])?;
                write!(f, " {op} ")?;
                write_operand(f, &children[1])
            }
            ScalarOp::InPredicate { negated } => {
                write_operand(f, &children[0])?;
                write!(f, " {}IN (", not_prefix(*negated))?;
                write_list(f, &children[1..])?;
                write!(f, ")")
            }
            ScalarOp::BetweenPredicate { negated } => {
                write_operand(f, &children[0])?;
                write!(f, " {}BETWEEN ", not_prefix(*negated))?;
                write_operand(f, &children[1])?;
                write!(f, " AND ")?;
                write_operand(f, &children[2])
            }
            ScalarOp::LikePredicate(like) => {
                write_operand(f, &children[0])?;
                write!(f, " {like} ")?;
                write_operand(f, &children[1])
            }
            ScalarOp::IsNullPredicate { negated } => {
                write_operand(f, &children[0])?;
                write!(f, " IS {}NULL", not_prefix(*negated))
            }
            ScalarOp::Exists { negated } => {
                write!(f, "{}EXISTS", not_prefix(*negated))?;
                if !children.is_empty() {
                    write!(f, " (")?;
                    write_list(f, children)?;
                    write!(f, ")")?;
                }
                Ok(())
            }
            ScalarOp::CaseWhen(layout) => {
                write!(f, "CASE")?;
                if let Some(case) = self.case_clause() {
                    write!(f, " {case}")?;
                }
                for i in 0..layout.when_clause_size() {
                    write!(
                        f,
                        " WHEN {} THEN {}",
                        children[layout.when_index(i)],
                        children[layout.then_index(i)]
                    )?;
                }
                if let Some(else_clause) = self.else_clause() {
                    write!(f, " ELSE {else_clause}")?;
                }
                write!(f, " END")
            }
            ScalarOp::Cast { .. } => write!(f, "cast({} AS {})", children[0], self.data_type()),
        }
    }
}

fn not_prefix(negated: bool) -> &'static str {
    if negated { "NOT " } else { "" }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[ScalarOperator]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

/// Parenthesize nested predicates so precedence stays visible.
fn write_operand(f: &mut fmt::Formatter<'_>, operand: &ScalarOperator) -> fmt::Result {
    match operand.op() {
        ScalarOp::BinaryPredicate(_)
        | ScalarOp::CompoundPredicate(_)
        | ScalarOp::InPredicate { .. }
        | ScalarOp::BetweenPredicate { .. }
        | ScalarOp::LikePredicate(_)
        | ScalarOp::IsNullPredicate { .. } => write!(f, "({operand})"),
        _ => write!(f, "{operand}"),
    }
}
