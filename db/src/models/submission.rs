use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::Set, PaginatorTrait, QueryOrder};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use strum::{Display, EnumString};
use uuid::Uuid;

/// Closed set of submission categories. The category decides which content
/// sniffing rule was applied to the file at intake time.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    EnumString,
    Display,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "category_enum")]
pub enum Category {
    #[strum(serialize = "PROGRAMMING")]
    #[sea_orm(string_value = "PROGRAMMING")]
    #[serde(rename = "PROGRAMMING")]
    Programming,
    #[strum(serialize = "AIGC")]
    #[sea_orm(string_value = "AIGC")]
    #[serde(rename = "AIGC")]
    Aigc,
}

/// A single student work submission.
///
/// Records are created once, at upload acceptance time, after the file has
/// been written to disk under `stored_file_name`. They are never mutated.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "submissions")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Opaque identifier, assigned at creation.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub student_name: String,
    pub grade: i32,
    pub class_number: i32,
    pub category: Category,
    pub work_title: String,
    /// Original upload name, kept for display and download naming only.
    pub file_name: String,
    /// Opaque on-disk name, the only value ever used for filesystem access.
    #[sea_orm(unique)]
    pub stored_file_name: String,
    /// Declared content type of the upload, used as a fallback response header.
    pub file_type: Option<String>,
    pub file_size: i64,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Inserts a new submission record with a fresh UUID and the current time.
    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        db: &DatabaseConnection,
        student_name: &str,
        grade: i32,
        class_number: i32,
        category: Category,
        work_title: &str,
        file_name: &str,
        stored_file_name: &str,
        file_type: Option<&str>,
        file_size: i64,
    ) -> Result<Self, DbErr> {
        let submission = ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            student_name: Set(student_name.to_owned()),
            grade: Set(grade),
            class_number: Set(class_number),
            category: Set(category),
            work_title: Set(work_title.to_owned()),
            file_name: Set(file_name.to_owned()),
            stored_file_name: Set(stored_file_name.to_owned()),
            file_type: Set(file_type.map(str::to_owned)),
            file_size: Set(file_size),
            submitted_at: Set(Utc::now()),
        };

        submission.insert(db).await
    }

    pub async fn find_by_id(db: &DatabaseConnection, id: &str) -> Result<Option<Self>, DbErr> {
        Entity::find_by_id(id).one(db).await
    }

    /// Full submission history, newest first. The id is a deterministic
    /// secondary key for records sharing a timestamp.
    pub async fn find_all(db: &DatabaseConnection) -> Result<Vec<Self>, DbErr> {
        Entity::find()
            .order_by_desc(Column::SubmittedAt)
            .order_by_asc(Column::Id)
            .all(db)
            .await
    }

    /// One record per distinct (grade, class_number, student_name, category)
    /// tuple, keeping the most recent `submitted_at` within each group.
    ///
    /// Sort descending, then keep the first occurrence per key. SQLite has no
    /// `DISTINCT ON`, and this keeps the tie-break identical to `find_all`.
    pub async fn find_latest_per_group(db: &DatabaseConnection) -> Result<Vec<Self>, DbErr> {
        let all = Self::find_all(db).await?;

        let mut seen = HashSet::new();
        Ok(all
            .into_iter()
            .filter(|s| {
                seen.insert((
                    s.grade,
                    s.class_number,
                    s.student_name.clone(),
                    s.category.clone(),
                ))
            })
            .collect())
    }

    /// Whether `student_name` has at least one submission within the server's
    /// local calendar day, `[midnight today, midnight tomorrow)`.
    pub async fn has_submitted_today(
        db: &DatabaseConnection,
        student_name: &str,
    ) -> Result<bool, DbErr> {
        let (start, end) = local_day_bounds();

        let count = Entity::find()
            .filter(Column::StudentName.eq(student_name))
            .filter(Column::SubmittedAt.gte(start))
            .filter(Column::SubmittedAt.lt(end))
            .count(db)
            .await?;

        Ok(count > 0)
    }
}

fn local_day_bounds() -> (DateTime<Utc>, DateTime<Utc>) {
    let today = Local::now().date_naive();
    let tomorrow = today.succ_opt().unwrap_or(today);
    (local_midnight(today), local_midnight(tomorrow))
}

fn local_midnight(day: NaiveDate) -> DateTime<Utc> {
    let naive = day.and_time(NaiveTime::MIN);
    match Local.from_local_datetime(&naive) {
        chrono::LocalResult::Single(dt) => dt.with_timezone(&Utc),
        // DST gap or fold at midnight: take the earlier instant.
        chrono::LocalResult::Ambiguous(dt, _) => dt.with_timezone(&Utc),
        chrono::LocalResult::None => Utc.from_utc_datetime(&naive),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, IntoActiveModel};
    use tempfile::TempDir;

    async fn test_db() -> (DatabaseConnection, TempDir) {
        let tmp = TempDir::new().unwrap();
        let url = format!(
            "sqlite://{}?mode=rwc",
            tmp.path().join("test.db").to_string_lossy()
        );
        let db = Database::connect(&url).await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        (db, tmp)
    }

    async fn create_submission(
        db: &DatabaseConnection,
        student_name: &str,
        grade: i32,
        class_number: i32,
        category: Category,
    ) -> Model {
        Model::create(
            db,
            student_name,
            grade,
            class_number,
            category,
            "My Work",
            "work.sb3",
            &format!("{}.sb3", Uuid::new_v4()),
            Some("application/octet-stream"),
            1024,
        )
        .await
        .unwrap()
    }

    async fn backdate(db: &DatabaseConnection, model: &Model, at: DateTime<Utc>) -> Model {
        let mut active = model.clone().into_active_model();
        active.submitted_at = Set(at);
        active.update(db).await.unwrap()
    }

    #[tokio::test]
    async fn find_all_orders_newest_first() {
        let (db, _tmp) = test_db().await;
        let now = Utc::now();

        let oldest = create_submission(&db, "Alice", 3, 2, Category::Programming).await;
        let oldest = backdate(&db, &oldest, now - Duration::hours(2)).await;
        let middle = create_submission(&db, "Bob", 4, 1, Category::Aigc).await;
        let middle = backdate(&db, &middle, now - Duration::hours(1)).await;
        let newest = create_submission(&db, "Cara", 5, 3, Category::Programming).await;

        let all = Model::find_all(&db).await.unwrap();
        let ids: Vec<&str> = all.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec![&newest.id, &middle.id, &oldest.id]);
    }

    #[tokio::test]
    async fn latest_per_group_keeps_most_recent_of_each_tuple() {
        let (db, _tmp) = test_db().await;
        let now = Utc::now();

        let first = create_submission(&db, "Alice", 3, 2, Category::Programming).await;
        backdate(&db, &first, now - Duration::hours(3)).await;
        let second = create_submission(&db, "Alice", 3, 2, Category::Programming).await;
        let second = backdate(&db, &second, now - Duration::hours(1)).await;
        // Same student, different category: its own group.
        let aigc = create_submission(&db, "Alice", 3, 2, Category::Aigc).await;
        let other = create_submission(&db, "Bob", 4, 1, Category::Programming).await;

        let latest = Model::find_latest_per_group(&db).await.unwrap();
        assert_eq!(latest.len(), 3);

        let alice_programming = latest
            .iter()
            .find(|s| s.student_name == "Alice" && s.category == Category::Programming)
            .unwrap();
        assert_eq!(alice_programming.id, second.id);
        assert!(latest.iter().any(|s| s.id == aigc.id));
        assert!(latest.iter().any(|s| s.id == other.id));
    }

    #[tokio::test]
    async fn has_submitted_today_matches_exact_name_and_day() {
        let (db, _tmp) = test_db().await;

        create_submission(&db, "Alice", 3, 2, Category::Programming).await;

        assert!(Model::has_submitted_today(&db, "Alice").await.unwrap());
        assert!(!Model::has_submitted_today(&db, "Bob").await.unwrap());

        let yesterday = create_submission(&db, "Bob", 4, 1, Category::Aigc).await;
        backdate(&db, &yesterday, Utc::now() - Duration::days(2)).await;
        assert!(!Model::has_submitted_today(&db, "Bob").await.unwrap());
    }

    #[test]
    fn category_round_trips_through_strings() {
        assert_eq!(
            "PROGRAMMING".parse::<Category>().unwrap(),
            Category::Programming
        );
        assert_eq!("AIGC".parse::<Category>().unwrap(), Category::Aigc);
        assert!("programming".parse::<Category>().is_err());
        assert!("OTHER".parse::<Category>().is_err());
        assert_eq!(Category::Programming.to_string(), "PROGRAMMING");
    }
}
