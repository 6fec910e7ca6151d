use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct ListQuery {
    pub skip: Option<u64>,
    pub limit: Option<u64>,
}

impl ListQuery {
    pub fn get_skip(&self) -> u64 {
        self.skip.unwrap_or(0)
    }

    pub fn get_limit(&self) -> u64 {
        self.limit.unwrap_or(100).clamp(1, 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query_defaults() {
        let query = ListQuery {
            skip: None,
            limit: None,
        };
        assert_eq!(query.get_skip(), 0);
        assert_eq!(query.get_limit(), 100);
    }

    #[test]
    fn test_list_query_limit_clamped() {
        let query = ListQuery {
            skip: Some(5),
            limit: Some(500),
        };
        assert_eq!(query.get_skip(), 5);
        assert_eq!(query.get_limit(), 100);

        let query = ListQuery {
            skip: None,
            limit: Some(0),
        };
        assert_eq!(query.get_limit(), 1);
    }
}
