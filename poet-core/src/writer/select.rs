/// Shape of a select statement: projection, filter, grouping, ordering and page.
///
/// ```
/// # use poet_core::Select;
/// let select = Select::new()
///     .exclude("password")
///     .filter("{#name} like ?")
///     .order_by("{#createdAt} desc")
///     .range(20, 10);
/// assert_eq!(select.count, 10);
/// ```
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Select<'a> {
    /// Comma separated fields to project, wins over `exclude`.
    pub include: Option<&'a str>,
    /// Comma separated fields not to project.
    pub exclude: Option<&'a str>,
    /// First row, negative values count as zero.
    pub start: i64,
    /// Rows in the page, zero or less selects every row.
    pub count: i64,
    pub order_by: Option<&'a str>,
    pub group_by: Option<&'a str>,
    pub filter: Option<&'a str>,
}

impl<'a> Select<'a> {
    pub fn new() -> Self {
        Default::default()
    }
    pub fn include(mut self, fields: &'a str) -> Self {
        self.include = Some(fields);
        self
    }
    pub fn exclude(mut self, fields: &'a str) -> Self {
        self.exclude = Some(fields);
        self
    }
    pub fn range(mut self, start: i64, count: i64) -> Self {
        self.start = start;
        self.count = count;
        self
    }
    pub fn order_by(mut self, order_by: &'a str) -> Self {
        self.order_by = Some(order_by);
        self
    }
    pub fn group_by(mut self, group_by: &'a str) -> Self {
        self.group_by = Some(group_by);
        self
    }
    pub fn filter(mut self, filter: &'a str) -> Self {
        self.filter = Some(filter);
        self
    }
}
