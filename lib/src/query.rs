use chrono::{DateTime, Utc};

/// Filters for the log endpoints. Only set fields are rendered into
/// the query string; time bounds are sent as epoch seconds.
#[derive(Debug, Default)]
pub struct LogQuery {
    pub count: Option<u32>,
    pub offset: Option<u32>,
    pub created_gt: Option<DateTime<Utc>>,
    pub created_gte: Option<DateTime<Utc>>,
    pub created_lt: Option<DateTime<Utc>>,
    pub created_lte: Option<DateTime<Utc>>,
}

impl LogQuery {
    /// Render as an encoded query string, or `None` if no field is set.
    pub fn to_query_string(&self) -> Option<String> {
        let mut query = url::form_urlencoded::Serializer::new(String::new());
        let mut any = false;

        if let Some(count) = self.count {
            query.append_pair("count", &count.to_string());
            any = true;
        }
        if let Some(offset) = self.offset {
            query.append_pair("offset", &offset.to_string());
            any = true;
        }
        if let Some(t) = self.created_gt {
            query.append_pair("created_gt", &t.timestamp().to_string());
            any = true;
        }
        if let Some(t) = self.created_gte {
            query.append_pair("created_gte", &t.timestamp().to_string());
            any = true;
        }
        if let Some(t) = self.created_lt {
            query.append_pair("created_lt", &t.timestamp().to_string());
            any = true;
        }
        if let Some(t) = self.created_lte {
            query.append_pair("created_lte", &t.timestamp().to_string());
            any = true;
        }

        if any {
            Some(query.finish())
        } else {
            None
        }
    }
}
