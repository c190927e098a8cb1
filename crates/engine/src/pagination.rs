//! Cursor pagination shared by every record list.
//!
//! Pages run newest → oldest by `(date DESC, id DESC)`. The cursor is the
//! key of the last row returned, encoded as URL-safe base64 JSON.

use base64::Engine as _;
use chrono::NaiveDate;
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    Select,
};
use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

pub const DEFAULT_PAGE_LIMIT: u64 = 50;
pub const MAX_PAGE_LIMIT: u64 = 200;

/// Requested page: `limit` is clamped to `1..=MAX_PAGE_LIMIT`.
#[derive(Clone, Debug, Default)]
pub struct PageRequest {
    pub limit: Option<u64>,
    pub cursor: Option<String>,
}

impl PageRequest {
    pub fn first(limit: u64) -> Self {
        Self {
            limit: Some(limit),
            cursor: None,
        }
    }

    pub fn after(limit: u64, cursor: impl Into<String>) -> Self {
        Self {
            limit: Some(limit),
            cursor: Some(cursor.into()),
        }
    }

    pub(crate) fn effective_limit(&self) -> u64 {
        self.limit
            .unwrap_or(DEFAULT_PAGE_LIMIT)
            .clamp(1, MAX_PAGE_LIMIT)
    }
}

/// One page of records plus the cursor for the next one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_cursor: Option<String>,
}

impl<T> Page<T> {
    pub(crate) fn try_map<U>(
        self,
        f: impl FnMut(T) -> ResultEngine<U>,
    ) -> ResultEngine<Page<U>> {
        Ok(Page {
            items: self.items.into_iter().map(f).collect::<ResultEngine<_>>()?,
            next_cursor: self.next_cursor,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct PageCursor {
    date: NaiveDate,
    id: String,
}

impl PageCursor {
    fn encode(&self) -> ResultEngine<String> {
        let bytes = serde_json::to_vec(self)
            .map_err(|_| EngineError::InvalidCursor("invalid page cursor".to_string()))?;
        Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes))
    }

    fn decode(input: &str) -> ResultEngine<Self> {
        let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .decode(input.as_bytes())
            .map_err(|_| EngineError::InvalidCursor("invalid page cursor".to_string()))?;
        serde_json::from_slice::<Self>(&bytes)
            .map_err(|_| EngineError::InvalidCursor("invalid page cursor".to_string()))
    }
}

/// Runs `query` as one page ordered by `(date_col DESC, id_col DESC)`.
///
/// `key` extracts the `(date, id)` pair of a row; it is used to build the
/// next cursor.
pub(crate) async fn paginate<E, C>(
    db: &C,
    query: Select<E>,
    date_col: E::Column,
    id_col: E::Column,
    page: &PageRequest,
    key: fn(&E::Model) -> (NaiveDate, String),
) -> ResultEngine<Page<E::Model>>
where
    E: EntityTrait,
    C: ConnectionTrait,
{
    let limit = page.effective_limit();
    let mut query = query;
    if let Some(raw) = page.cursor.as_deref() {
        let cursor = PageCursor::decode(raw)?;
        query = query.filter(
            Condition::any().add(date_col.lt(cursor.date)).add(
                Condition::all()
                    .add(date_col.eq(cursor.date))
                    .add(id_col.lt(cursor.id)),
            ),
        );
    }

    let mut items = query
        .order_by_desc(date_col)
        .order_by_desc(id_col)
        .limit(limit.saturating_add(1))
        .all(db)
        .await?;

    let next_cursor = if items.len() as u64 > limit {
        items.truncate(limit as usize);
        match items.last() {
            Some(last) => {
                let (date, id) = key(last);
                Some(PageCursor { date, id }.encode()?)
            }
            None => None,
        }
    } else {
        None
    };

    Ok(Page { items, next_cursor })
}
