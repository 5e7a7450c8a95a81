use sea_orm::ColumnTrait;
use sea_orm::sea_query::{Expr, LikeExpr, SimpleExpr};

/// 转义 LIKE 模式中的通配符，配合 `ESCAPE '\'` 使用
pub fn escape_like_pattern(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// `col LIKE '%term%' ESCAPE '\'`，列名带表名限定，可用于连表查询
pub fn like_contains<C: ColumnTrait>(col: C, term: &str) -> SimpleExpr {
    let pattern = format!("%{}%", escape_like_pattern(term));
    Expr::col((col.entity_name(), col)).like(LikeExpr::new(pattern).escape('\\'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_pattern() {
        assert_eq!(escape_like_pattern("CS101"), "CS101");
        assert_eq!(escape_like_pattern("100%"), "100\\%");
        assert_eq!(escape_like_pattern("a_b\\c"), "a\\_b\\\\c");
    }
}
