use super::Expr;

/// An iterator that iteratively traverses the tree of expressions in left-to-right post-order
/// (i.e. depth-first).
///
/// This iterator is created by [`Expr::post_order_iter`].
pub struct ExprIter<'a> {
    stack: Vec<&'a Expr>,
    last_visited: Option<&'a Expr>,
}

impl<'a> ExprIter<'a> {
    /// Creates a new iterator that traverses the tree of expressions in left-to-right post-order
    /// (i.e. depth-first).
    pub fn new(expr: &'a Expr) -> Self {
        Self {
            stack: vec![expr],
            last_visited: None,
        }
    }

    /// Pops the current expression in the stack and marks it as the last visited expression.
    fn visit(&mut self) -> Option<&'a Expr> {
        self.last_visited = Some(self.stack.pop()?);
        self.last_visited
    }

    /// Returns true if the given expression is the last visited expression.
    ///
    /// Operands are compared by address, since the same shared node may appear more than once
    /// in an operand list.
    fn is_last_visited(&self, expr: &'a Expr) -> bool {
        match self.last_visited {
            Some(last_visited) => std::ptr::eq(last_visited, expr),
            None => false,
        }
    }
}

impl<'a> Iterator for ExprIter<'a> {
    type Item = &'a Expr;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let expr = *self.stack.last()?;
            let operands = expr.operands();
            match operands.last() {
                Some(last) if !self.is_last_visited(last) => {
                    for operand in operands.iter().rev() {
                        self.stack.push(operand);
                    }
                },
                _ => return self.visit(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::{Expr, Operator};
    use pretty_assertions::assert_eq;

    #[test]
    fn post_order() {
        let x = Expr::symbol("x");
        let expr = Expr::raw(Operator::Add, vec![
            Expr::raw(Operator::Multiply, vec![Expr::integer(2), x.clone()]),
            x.clone(),
        ]);

        let visited = expr.post_order_iter().map(|e| e.to_string()).collect::<Vec<_>>();
        assert_eq!(visited, vec!["2", "x", "2 * x", "x", "2 * x + x"]);
    }
}
