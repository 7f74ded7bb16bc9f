//! SQL used by the demo actions.

/// Database created by `init` and used by every later action.
pub const DEMO_DATABASE: &str = "demodb";

/// No-op statement used to wake a paused cluster.
pub const WARMUP_SQL: &str = "select 1";

pub const CREATE_DATABASE_SQL: &str =
    "CREATE DATABASE demodb CHARACTER SET utf8mb4 COLLATE utf8mb4_unicode_ci";

pub const CREATE_TABLE_SQL: &str = "CREATE table demodb.demotable(id BIGINT AUTO_INCREMENT, demoname VARCHAR(255), demodate DATETIME, PRIMARY KEY (id))";

/// Seed insert run by `init`, outside of any database context.
pub const SEED_INSERT_SQL: &str =
    "INSERT INTO demodb.demotable(demoname,demodate) VALUES (:name,:date)";

pub const SELECT_ALL_SQL: &str = "select * from demotable";

pub const INSERT_ROW_SQL: &str = "INSERT INTO demotable(demoname,demodate) VALUES (:name,:date)";

pub const INSERT_NAME_SQL: &str = "INSERT INTO demotable(demoname) VALUES(:name)";

pub const SEED_NAME: &str = "Welcome";
pub const SEED_DATE: &str = "2019-08-18 01:01:01";

/// Rows inserted by the `batch` action, as `(name, date)`.
pub const BATCH_ROWS: [(&str, &str); 2] = [("John", "2019-08-19"), ("Peter", "2019-08-20")];

pub const FIRST_TRANSACTION_NAME: &str = "NAME1";

/// Name of the second transactional row, derived from the first row's key.
pub fn second_transaction_name(first_id: i64) -> String {
    format!("NAME2 after {first_id}")
}
