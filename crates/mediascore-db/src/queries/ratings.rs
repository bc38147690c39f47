//! Rating record queries.
//!
//! Records are keyed by their content-addressed primary key. The file-name
//! hash is a plain (non-unique) index kept in the same row, so every upsert
//! updates both lookups atomically.

use mediascore_common::{ContentKey, Error, Ratings, RatingRecord, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};

const SELECT_COLUMNS: &str = "id, base_name_hash, title, year, episode_title, season, episode_nr,
     imdb_rating, rt_rating, mc_rating, is_tv";

/// Insert a record, replacing any existing row with the same primary key.
///
/// Two file names that resolve to the same identity share one row. The later
/// name's hash replaces the earlier one, so the earlier file misses the
/// file-name index on the next run and is resolved (and replaced) again.
pub fn upsert(conn: &Connection, record: &RatingRecord) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO ratings (id, base_name_hash, title, year, episode_title, season,
             episode_nr, imdb_rating, rt_rating, mc_rating, is_tv)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            record.primary_key.as_bytes().as_slice(),
            record.base_name_hash.as_bytes().as_slice(),
            record.title,
            record.year,
            record.episode_title,
            record.season,
            record.episode_number,
            record.ratings.imdb,
            record.ratings.rotten_tomatoes,
            record.ratings.metacritic,
            record.is_tv,
        ],
    )
    .map_err(|e| Error::database(e.to_string()))?;

    Ok(())
}

/// Get a record by its primary key.
pub fn get_by_id(conn: &Connection, id: &ContentKey) -> Result<Option<RatingRecord>> {
    let sql = format!("SELECT {} FROM ratings WHERE id = ?1", SELECT_COLUMNS);
    query_one(conn, &sql, id)
}

/// Get the oldest record whose file-name hash matches.
pub fn get_by_base_name_hash(
    conn: &Connection,
    base_name_hash: &ContentKey,
) -> Result<Option<RatingRecord>> {
    let sql = format!(
        "SELECT {} FROM ratings WHERE base_name_hash = ?1 ORDER BY rowid LIMIT 1",
        SELECT_COLUMNS
    );
    query_one(conn, &sql, base_name_hash)
}

fn query_one(conn: &Connection, sql: &str, key: &ContentKey) -> Result<Option<RatingRecord>> {
    let raw = conn
        .query_row(sql, params![key.as_bytes().as_slice()], RawRecord::from_row)
        .optional()
        .map_err(|e| Error::database(e.to_string()))?;

    raw.map(RawRecord::into_record).transpose()
}

/// Row as read from SQLite, before key validation.
struct RawRecord {
    id: Vec<u8>,
    base_name_hash: Vec<u8>,
    title: String,
    year: String,
    episode_title: String,
    season: String,
    episode_nr: String,
    imdb_rating: String,
    rt_rating: String,
    mc_rating: String,
    is_tv: bool,
}

impl RawRecord {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            base_name_hash: row.get(1)?,
            title: row.get(2)?,
            year: row.get(3)?,
            episode_title: row.get(4)?,
            season: row.get(5)?,
            episode_nr: row.get(6)?,
            imdb_rating: row.get(7)?,
            rt_rating: row.get(8)?,
            mc_rating: row.get(9)?,
            is_tv: row.get(10)?,
        })
    }

    fn into_record(self) -> Result<RatingRecord> {
        Ok(RatingRecord {
            primary_key: ContentKey::from_slice(&self.id)?,
            base_name_hash: ContentKey::from_slice(&self.base_name_hash)?,
            title: self.title,
            year: self.year,
            episode_title: self.episode_title,
            season: self.season,
            episode_number: self.episode_nr,
            ratings: Ratings {
                imdb: self.imdb_rating,
                rotten_tomatoes: self.rt_rating,
                metacritic: self.mc_rating,
            },
            is_tv: self.is_tv,
        })
    }
}
