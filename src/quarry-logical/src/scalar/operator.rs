//! The scalar operator node.

use common_error::{QuarryError, QuarryResult};
use quarry_core::{DataType, Value};

use crate::column::ColumnRef;

use super::{CallOp, CaseWhenLayout, ScalarKind, ScalarOp};

/// A node in a scalar expression tree.
///
/// A parent exclusively owns its children. Child count and roles are fixed by
/// the kind at construction; rewrites replace children by index or rebuild a
/// node wholesale.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarOperator {
    op: ScalarOp,
    data_type: DataType,
    children: Vec<ScalarOperator>,
}

impl ScalarOperator {
    pub(crate) fn new(op: ScalarOp, data_type: DataType, children: Vec<ScalarOperator>) -> Self {
        Self {
            op,
            data_type,
            children,
        }
    }

    /// Kind-specific payload.
    pub fn op(&self) -> &ScalarOp {
        &self.op
    }

    /// Kind tag.
    pub fn kind(&self) -> ScalarKind {
        self.op.kind()
    }

    /// Declared result type.
    pub fn data_type(&self) -> &DataType {
        &self.data_type
    }

    /// Change the declared result type.
    pub fn set_type(&mut self, data_type: DataType) {
        self.data_type = data_type;
    }

    /// Children in positional order.
    pub fn children(&self) -> &[ScalarOperator] {
        &self.children
    }

    /// Number of children.
    pub fn num_children(&self) -> usize {
        self.children.len()
    }

    /// Child at index `i`.
    pub fn child(&self, i: usize) -> QuarryResult<&ScalarOperator> {
        self.children.get(i).ok_or_else(|| self.out_of_range(i))
    }

    /// Replace the child at index `i`, returning the old one.
    pub fn set_child(&mut self, i: usize, child: ScalarOperator) -> QuarryResult<ScalarOperator> {
        let len = self.children.len();
        match self.children.get_mut(i) {
            Some(slot) => Ok(std::mem::replace(slot, child)),
            None => Err(out_of_range(&self.op, i, len)),
        }
    }

    /// Replace the child at index `i` with `f(child)`.
    ///
    /// Only an out-of-range index fails, and then the node is left untouched.
    pub fn map_child<F>(&mut self, i: usize, f: F) -> QuarryResult<()>
    where
        F: FnOnce(ScalarOperator) -> ScalarOperator,
    {
        let old = self.set_child(i, Self::placeholder())?;
        self.children[i] = f(old);
        Ok(())
    }

    /// Rebuild this node with every child replaced by `f(child)`.
    pub fn map_children<F>(mut self, f: F) -> QuarryResult<Self>
    where
        F: FnMut(ScalarOperator) -> QuarryResult<ScalarOperator>,
    {
        self.children = std::mem::take(&mut self.children)
            .into_iter()
            .map(f)
            .collect::<QuarryResult<Vec<_>>>()?;
        Ok(self)
    }

    /// Decompose into payload, type and children.
    pub fn into_parts(self) -> (ScalarOp, DataType, Vec<ScalarOperator>) {
        (self.op, self.data_type, self.children)
    }

    fn placeholder() -> Self {
        Self::new(ScalarOp::Constant(Value::Null), DataType::Null, Vec::new())
    }

    fn out_of_range(&self, i: usize) -> QuarryError {
        out_of_range(&self.op, i, self.children.len())
    }

    // =========================================================================
    // Classification
    // =========================================================================

    /// True only for literal nodes.
    pub fn is_constant_ref(&self) -> bool {
        matches!(self.op, ScalarOp::Constant(_))
    }

    /// True for literals and for non-column nodes whose children are all
    /// constant. A node without children is constant only if it is a literal.
    pub fn is_constant(&self) -> bool {
        match self.op {
            ScalarOp::Constant(_) => true,
            ScalarOp::ColumnRef(_) => false,
            _ => !self.children.is_empty() && self.children.iter().all(Self::is_constant),
        }
    }

    /// Negation of [`is_constant`](Self::is_constant).
    pub fn is_variable(&self) -> bool {
        !self.is_constant()
    }

    /// Whether this is a column reference.
    pub fn is_column_ref(&self) -> bool {
        matches!(self.op, ScalarOp::ColumnRef(_))
    }

    /// Literal value of a constant node.
    pub fn as_constant(&self) -> Option<&Value> {
        match &self.op {
            ScalarOp::Constant(v) => Some(v),
            _ => None,
        }
    }

    /// Column of a column reference node.
    pub fn as_column_ref(&self) -> Option<&ColumnRef> {
        match &self.op {
            ScalarOp::ColumnRef(c) => Some(c),
            _ => None,
        }
    }

    /// Call payload of a function call node.
    pub fn call_op(&self) -> Option<&CallOp> {
        match &self.op {
            ScalarOp::Call(call) => Some(call),
            _ => None,
        }
    }

    /// Whether this is a CAST inserted by the optimizer.
    pub fn is_implicit_cast(&self) -> bool {
        matches!(self.op, ScalarOp::Cast { implicit: true })
    }

    // =========================================================================
    // CASE accessors
    // =========================================================================

    /// Child layout of a CASE node.
    pub fn case_when_layout(&self) -> Option<CaseWhenLayout> {
        match self.op {
            ScalarOp::CaseWhen(layout) => Some(layout),
            _ => None,
        }
    }

    fn require_case_when(&self) -> QuarryResult<CaseWhenLayout> {
        self.case_when_layout()
            .ok_or_else(|| QuarryError::internal(format!("{:?} is not a CASE node", self.kind())))
    }

    /// Number of WHEN/THEN pairs of a CASE node.
    pub fn when_clause_size(&self) -> QuarryResult<usize> {
        Ok(self.require_case_when()?.when_clause_size())
    }

    /// WHEN clause `i` of a CASE node.
    pub fn when_clause(&self, i: usize) -> QuarryResult<&ScalarOperator> {
        let layout = self.require_case_when()?;
        if i >= layout.when_clause_size() {
            return Err(self.out_of_range(layout.when_index(i)));
        }
        self.child(layout.when_index(i))
    }

    /// THEN clause `i` of a CASE node.
    pub fn then_clause(&self, i: usize) -> QuarryResult<&ScalarOperator> {
        let layout = self.require_case_when()?;
        if i >= layout.when_clause_size() {
            return Err(self.out_of_range(layout.then_index(i)));
        }
        self.child(layout.then_index(i))
    }

    /// Operand of a simple CASE.
    pub fn case_clause(&self) -> Option<&ScalarOperator> {
        self.case_when_layout()?
            .case_index()
            .and_then(|i| self.children.get(i))
    }

    /// ELSE clause of a CASE node.
    pub fn else_clause(&self) -> Option<&ScalarOperator> {
        self.case_when_layout()?
            .else_index()
            .and_then(|i| self.children.get(i))
    }

    // =========================================================================
    // Utilities
    // =========================================================================

    /// Columns referenced anywhere in this tree, in first-use order.
    pub fn column_refs(&self) -> Vec<ColumnRef> {
        let mut refs = Vec::new();
        self.collect_column_refs(&mut refs);
        refs
    }

    fn collect_column_refs(&self, refs: &mut Vec<ColumnRef>) {
        if let ScalarOp::ColumnRef(column) = &self.op {
            if !refs.contains(column) {
                refs.push(column.clone());
            }
        }
        for child in &self.children {
            child.collect_column_refs(refs);
        }
    }

    /// Number of nodes in this tree.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Self::node_count).sum::<usize>()
    }
}

fn out_of_range(op: &ScalarOp, i: usize, len: usize) -> QuarryError {
    QuarryError::internal(format!(
        "child index {i} out of range for {:?} with {len} children",
        op.kind()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalar::BinaryType;

    fn col(id: u32, name: &str, ty: DataType) -> ScalarOperator {
        ScalarOperator::column(ColumnRef::new(id, name, ty))
    }

    #[test]
    fn test_set_child_returns_old() {
        let mut pred = ScalarOperator::binary(
            BinaryType::Eq,
            col(1, "a", DataType::Int),
            ScalarOperator::constant(5i32),
        );
        let old = pred.set_child(1, ScalarOperator::constant(6i64)).unwrap();
        assert_eq!(old.as_constant(), Some(&Value::Int(5)));
        assert_eq!(pred.child(1).unwrap().data_type(), &DataType::BigInt);
        assert!(pred.set_child(2, ScalarOperator::constant(1i32)).is_err());
        assert!(pred.child(7).is_err());
    }

    #[test]
    fn test_map_child_in_place() {
        let mut pred = ScalarOperator::binary(
            BinaryType::Lt,
            col(1, "a", DataType::Int),
            ScalarOperator::constant(5i32),
        );
        pred.map_child(0, |c| ScalarOperator::cast(c, DataType::BigInt, true))
            .unwrap();
        assert!(pred.child(0).unwrap().is_implicit_cast());
        assert_eq!(pred.child(0).unwrap().data_type(), &DataType::BigInt);
    }

    #[test]
    fn test_map_child_out_of_range_keeps_children() {
        let mut pred = ScalarOperator::binary(
            BinaryType::Lt,
            col(1, "a", DataType::Int),
            ScalarOperator::constant(5i32),
        );
        let before = pred.clone();
        assert!(pred.map_child(3, |c| c).is_err());
        assert_eq!(pred, before);
        assert_eq!(pred.to_string(), "a < 5");
    }

    #[test]
    fn test_classification() {
        let lit = ScalarOperator::constant(1i32);
        let column = col(1, "a", DataType::Int);
        let folded = ScalarOperator::cast(ScalarOperator::constant(1i32), DataType::BigInt, false);
        let mixed = ScalarOperator::call("abs", DataType::Int, vec![column.clone()]);
        let nullary = ScalarOperator::call("now", DataType::DateTime, vec![]);

        assert!(lit.is_constant_ref() && lit.is_constant());
        assert!(column.is_variable());
        assert!(folded.is_constant() && !folded.is_constant_ref());
        assert!(mixed.is_variable());
        assert!(nullary.is_variable());
    }

    #[test]
    fn test_column_refs_are_deduplicated_in_order() {
        let a = col(1, "a", DataType::Int);
        let b = col(2, "b", DataType::Int);
        let pred = ScalarOperator::and(
            ScalarOperator::binary(BinaryType::Gt, b.clone(), a.clone()),
            ScalarOperator::binary(BinaryType::Lt, a, ScalarOperator::constant(3i32)),
        );
        let names: Vec<_> = pred.column_refs().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(pred.node_count(), 7);
    }
}
