/// Numeric precedence of the operators of a template expression.
pub trait OpPrecedence {
    /// Lower numbers bind weaker.
    fn precedence(&self) -> i32;
}

impl<T: OpPrecedence> OpPrecedence for &T {
    fn precedence(&self) -> i32 {
        (*self).precedence()
    }
}
