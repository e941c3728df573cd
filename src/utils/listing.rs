use sqlx::PgPool;
use sqlx::postgres::PgRow;
use tracing::error;

use crate::utils::errors::AppError;
use crate::utils::pagination::PageWindow;

/// Builder for the listing queries every entity family shares: a base
/// predicate that always excludes soft-deleted rows, an optional
/// case-insensitive keyword match OR-ed over designated columns, optional
/// equality filters, a count query over the same predicate, and a
/// LIMIT/OFFSET window over the ordered rows.
///
/// Owning the `is_deleted` predicate here means no listing path can forget
/// it.
pub struct ListQuery {
    from: String,
    columns: String,
    deleted_flag: String,
    conditions: Vec<String>,
    binds: Vec<String>,
    order_by: String,
}

impl ListQuery {
    /// `from` is the FROM clause body (table plus any joins), `columns` the
    /// select list for the data query, `deleted_flag` the qualified
    /// soft-delete column of the primary table.
    pub fn new(from: &str, columns: &str, deleted_flag: &str) -> Self {
        Self {
            from: from.to_string(),
            columns: columns.to_string(),
            deleted_flag: deleted_flag.to_string(),
            conditions: Vec::new(),
            binds: Vec::new(),
            order_by: String::new(),
        }
    }

    /// Case-insensitive substring match against any of `columns`, sharing a
    /// single bound `%keyword%` pattern. Blank keywords mean "no filter".
    pub fn keyword(mut self, columns: &[&str], keyword: Option<&str>) -> Self {
        if let Some(keyword) = keyword {
            let keyword = keyword.trim();
            if !keyword.is_empty() && !columns.is_empty() {
                self.binds.push(format!("%{}%", keyword));
                let placeholder = self.binds.len();
                let matches: Vec<String> = columns
                    .iter()
                    .map(|c| format!("{} ILIKE ${}", c, placeholder))
                    .collect();
                self.conditions.push(format!("({})", matches.join(" OR ")));
            }
        }
        self
    }

    /// Equality filter, skipped when the value is absent.
    pub fn equals(mut self, column: &str, value: Option<&str>) -> Self {
        if let Some(value) = value {
            self.binds.push(value.to_string());
            self.conditions
                .push(format!("{} = ${}", column, self.binds.len()));
        }
        self
    }

    pub fn order_by(mut self, order_by: &str) -> Self {
        self.order_by = order_by.to_string();
        self
    }

    fn where_clause(&self) -> String {
        let mut clause = format!("WHERE {} = FALSE", self.deleted_flag);
        for condition in &self.conditions {
            clause.push_str(" AND ");
            clause.push_str(condition);
        }
        clause
    }

    pub fn count_sql(&self) -> String {
        format!("SELECT COUNT(*) FROM {} {}", self.from, self.where_clause())
    }

    pub fn data_sql(&self, window: &PageWindow) -> String {
        let mut sql = format!(
            "SELECT {} FROM {} {}",
            self.columns,
            self.from,
            self.where_clause()
        );
        if !self.order_by.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&self.order_by);
        }
        sql.push_str(&format!(
            " LIMIT {} OFFSET {}",
            window.page_size,
            window.offset()
        ));
        sql
    }

    /// Runs the count query and the windowed data query, returning the rows
    /// and the total matching the unpaginated predicate.
    pub async fn fetch_page<T>(
        &self,
        db: &PgPool,
        window: &PageWindow,
    ) -> Result<(Vec<T>, i64), AppError>
    where
        T: for<'r> sqlx::FromRow<'r, PgRow> + Send + Unpin,
    {
        let count_sql = self.count_sql();
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        for bind in &self.binds {
            count_query = count_query.bind(bind);
        }
        let total = count_query.fetch_one(db).await.map_err(|e| {
            error!(error = %e, "Database error counting rows");
            AppError::database(anyhow::Error::from(e))
        })?;

        let data_sql = self.data_sql(window);
        let mut data_query = sqlx::query_as::<_, T>(&data_sql);
        for bind in &self.binds {
            data_query = data_query.bind(bind);
        }
        let rows = data_query.fetch_all(db).await.map_err(|e| {
            error!(error = %e, "Database error fetching rows");
            AppError::database(anyhow::Error::from(e))
        })?;

        Ok((rows, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window(page: i64, page_size: i64) -> PageWindow {
        PageWindow { page, page_size }
    }

    #[test]
    fn base_query_excludes_deleted_rows() {
        let query = ListQuery::new("accounts", "id, email", "is_deleted");
        assert_eq!(
            query.count_sql(),
            "SELECT COUNT(*) FROM accounts WHERE is_deleted = FALSE"
        );
        assert_eq!(
            query.data_sql(&window(1, 10)),
            "SELECT id, email FROM accounts WHERE is_deleted = FALSE LIMIT 10 OFFSET 0"
        );
    }

    #[test]
    fn keyword_is_ored_over_columns_with_one_bind() {
        let query = ListQuery::new("classes", "id", "is_deleted")
            .keyword(&["code", "name"], Some("abc"));
        assert_eq!(
            query.count_sql(),
            "SELECT COUNT(*) FROM classes WHERE is_deleted = FALSE \
             AND (code ILIKE $1 OR name ILIKE $1)"
        );
        assert_eq!(query.binds, vec!["%abc%".to_string()]);
    }

    #[test]
    fn blank_keyword_means_no_filter() {
        let query = ListQuery::new("classes", "id", "is_deleted")
            .keyword(&["code", "name"], Some("   "));
        assert_eq!(
            query.count_sql(),
            "SELECT COUNT(*) FROM classes WHERE is_deleted = FALSE"
        );
        assert!(query.binds.is_empty());
    }

    #[test]
    fn equality_filter_appends_after_keyword() {
        let query = ListQuery::new("accounts a", "a.id", "a.is_deleted")
            .keyword(&["a.email", "a.full_name"], Some("jo"))
            .equals("a.status", Some("active"));
        assert_eq!(
            query.count_sql(),
            "SELECT COUNT(*) FROM accounts a WHERE a.is_deleted = FALSE \
             AND (a.email ILIKE $1 OR a.full_name ILIKE $1) AND a.status = $2"
        );
        assert_eq!(query.binds, vec!["%jo%".to_string(), "active".to_string()]);
    }

    #[test]
    fn window_renders_limit_and_offset() {
        let query = ListQuery::new("students", "id", "is_deleted").order_by("code");
        assert_eq!(
            query.data_sql(&window(3, 25)),
            "SELECT id FROM students WHERE is_deleted = FALSE ORDER BY code LIMIT 25 OFFSET 50"
        );
    }

    #[test]
    fn joined_from_clause_passes_through() {
        let query = ListQuery::new(
            "students s INNER JOIN persons p ON p.id = s.person_id",
            "s.id, p.full_name",
            "s.is_deleted",
        )
        .keyword(&["s.code", "p.full_name"], Some("an"));
        assert_eq!(
            query.data_sql(&window(1, 10)),
            "SELECT s.id, p.full_name FROM students s INNER JOIN persons p ON p.id = s.person_id \
             WHERE s.is_deleted = FALSE AND (s.code ILIKE $1 OR p.full_name ILIKE $1) \
             LIMIT 10 OFFSET 0"
        );
    }
}
