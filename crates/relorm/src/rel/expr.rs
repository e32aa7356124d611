//! Expression nodes and the emission collector.
//!
//! Every node appends its own SQL text and bind values to a [`Collector`].
//! Nothing else keeps state, so the order in which nodes are written is the
//! order of the bind values, and the placeholder numbers follow from it.

use crate::value::Value;

/// How bind markers are rendered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Placeholder {
    /// `?` for every parameter.
    #[default]
    Question,
    /// `$1, $2, ...` numbered in emission order (PostgreSQL).
    Dollar,
}

/// Accumulates SQL text and the ordered list of bind values.
#[derive(Debug, Default)]
pub struct Collector {
    sql: String,
    values: Vec<Value>,
    style: Placeholder,
}

impl Collector {
    /// Create an empty collector rendering placeholders in `style`.
    pub fn new(style: Placeholder) -> Self {
        Self {
            sql: String::new(),
            values: Vec::new(),
            style,
        }
    }

    /// Append raw SQL text.
    pub fn push_str(&mut self, sql: &str) {
        self.sql.push_str(sql);
    }

    /// Append a placeholder and record `value` as its parameter.
    pub fn push_value(&mut self, value: Value) {
        self.values.push(value);
        match self.style {
            Placeholder::Question => self.sql.push('?'),
            Placeholder::Dollar => {
                self.sql.push('$');
                self.sql.push_str(&self.values.len().to_string());
            }
        }
    }

    /// Write `exprs` separated by `sep`.
    pub fn push_list(&mut self, exprs: &[Expr], sep: &str) {
        for (i, expr) in exprs.iter().enumerate() {
            if i > 0 {
                self.push_str(sep);
            }
            expr.write_to(self);
        }
    }

    /// SQL written so far.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Bind values collected so far.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Consume the collector.
    pub fn finish(self) -> (String, Vec<Value>) {
        (self.sql, self.values)
    }
}

/// An SQL fragment.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// A positional parameter.
    BindParam(Value),

    /// Raw SQL. Each `?` in `text` is bound to the next entry of `params`.
    Literal { text: String, params: Vec<Value> },

    /// A bare column reference.
    Field(String),

    /// `field = value`, both as an UPDATE `SET` item and as a WHERE equality.
    Assignment { field: String, value: Box<Expr> },

    /// `left IN (right...)`; `1=0` when `right` is empty.
    In { left: Box<Expr>, right: Vec<Expr> },

    /// `expr ASC`
    Ascending(Box<Expr>),

    /// `expr DESC`
    Descending(Box<Expr>),
}

impl Expr {
    /// A bind parameter.
    pub fn bind(value: impl Into<Value>) -> Self {
        Expr::BindParam(value.into())
    }

    /// Raw SQL without parameters.
    pub fn literal(text: impl Into<String>) -> Self {
        Expr::Literal {
            text: text.into(),
            params: Vec::new(),
        }
    }

    /// Raw SQL with `?` markers bound to `params` in order.
    pub fn literal_with(text: impl Into<String>, params: Vec<Value>) -> Self {
        Expr::Literal {
            text: text.into(),
            params,
        }
    }

    /// A column reference.
    pub fn field(name: impl Into<String>) -> Self {
        Expr::Field(name.into())
    }

    /// `field = ?` with `value` bound.
    pub fn assign(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Expr::Assignment {
            field: field.into(),
            value: Box::new(Expr::bind(value)),
        }
    }

    /// `field IN (?, ?, ...)` with every value bound.
    pub fn in_list(field: impl Into<String>, values: Vec<Value>) -> Self {
        Expr::In {
            left: Box::new(Expr::field(field)),
            right: values.into_iter().map(Expr::BindParam).collect(),
        }
    }

    /// Ascending order on a column.
    pub fn asc(field: impl Into<String>) -> Self {
        Expr::Ascending(Box::new(Expr::field(field)))
    }

    /// Descending order on a column.
    pub fn desc(field: impl Into<String>) -> Self {
        Expr::Descending(Box::new(Expr::field(field)))
    }

    /// The `(column, value)` pair of an `Assignment` whose value is a plain bind parameter.
    pub fn as_equality(&self) -> Option<(&str, &Value)> {
        match self {
            Expr::Assignment { field, value } => match value.as_ref() {
                Expr::BindParam(v) => Some((field.as_str(), v)),
                _ => None,
            },
            _ => None,
        }
    }

    /// Append this node's SQL and bind values.
    pub fn write_to(&self, c: &mut Collector) {
        match self {
            Expr::BindParam(value) => c.push_value(value.clone()),
            Expr::Literal { text, params } => write_literal(text, params, c),
            Expr::Field(name) => c.push_str(name),
            Expr::Assignment { field, value } => {
                c.push_str(field);
                c.push_str(" = ");
                value.write_to(c);
            }
            Expr::In { left, right } => {
                if right.is_empty() {
                    c.push_str("1=0");
                    return;
                }
                left.write_to(c);
                c.push_str(" IN (");
                c.push_list(right, ", ");
                c.push_str(")");
            }
            Expr::Ascending(expr) => {
                expr.write_to(c);
                c.push_str(" ASC");
            }
            Expr::Descending(expr) => {
                expr.write_to(c);
                c.push_str(" DESC");
            }
        }
    }

    /// Render this node alone.
    pub fn build(&self, style: Placeholder) -> (String, Vec<Value>) {
        let mut c = Collector::new(style);
        self.write_to(&mut c);
        c.finish()
    }
}

/// Write raw SQL, binding each `?` outside quotes to the next param.
///
/// `'...'` and `"..."` spans are copied untouched; a doubled quote inside
/// them closes and reopens the span, which leaves it quoted.
fn write_literal(text: &str, params: &[Value], c: &mut Collector) {
    let mut params = params.iter();
    let mut quote = None;
    let mut start = 0;
    for (i, ch) in text.char_indices() {
        match (quote, ch) {
            (Some(q), _) if ch == q => quote = None,
            (Some(_), _) => {}
            (None, '\'' | '"') => quote = Some(ch),
            (None, '?') => {
                // markers past the last param stay verbatim
                if let Some(value) = params.next() {
                    c.push_str(&text[start..i]);
                    c.push_value(value.clone());
                    start = i + 1;
                }
            }
            _ => {}
        }
    }
    c.push_str(&text[start..]);
}
