use crate::Properties;

/// Clause of the statement being written.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fragment {
    #[default]
    None,
    SqlSelect,
    SqlSelectFrom,
    SqlSelectWhere,
    SqlSelectGroupBy,
    SqlSelectOrderBy,
    SqlUpdateWhere,
    SqlDeleteFromWhere,
}

impl Fragment {
    pub fn is_where(&self) -> bool {
        matches!(
            self,
            Fragment::SqlSelectWhere | Fragment::SqlUpdateWhere | Fragment::SqlDeleteFromWhere
        )
    }
}

/// State carried while writing a statement.
#[derive(Default, Clone, Copy)]
pub struct Context<'a> {
    pub fragment: Fragment,
    /// Filter object whose properties the where clause can read.
    pub object: Option<&'a dyn Properties>,
}

impl<'a> Context<'a> {
    pub fn new(fragment: Fragment, object: Option<&'a dyn Properties>) -> Self {
        Self { fragment, object }
    }

    pub fn switch_fragment(&self, fragment: Fragment) -> Self {
        Self { fragment, ..*self }
    }

    /// Filter object visible in the current fragment, only where clauses see it.
    pub fn visible_object(&self) -> Option<&'a dyn Properties> {
        if self.fragment.is_where() {
            self.object
        } else {
            None
        }
    }
}
