use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202601050001_create_submissions"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("submissions"))
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Alias::new("id"))
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Alias::new("student_name"))
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Alias::new("grade")).integer().not_null())
                    .col(
                        ColumnDef::new(Alias::new("class_number"))
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Alias::new("category")).string().not_null())
                    .col(
                        ColumnDef::new(Alias::new("work_title"))
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Alias::new("file_name")).string().not_null())
                    .col(
                        ColumnDef::new(Alias::new("stored_file_name"))
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Alias::new("file_type")).string().null())
                    .col(
                        ColumnDef::new(Alias::new("file_size"))
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Alias::new("submitted_at"))
                            .timestamp()
                            .not_null()
                            .default(Expr::cust("CURRENT_TIMESTAMP")),
                    )
                    .to_owned(),
            )
            .await?;

        // Quota checks filter on (student_name, submitted_at).
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_submissions_student_submitted_at")
                    .table(Alias::new("submissions"))
                    .col(Alias::new("student_name"))
                    .col(Alias::new("submitted_at"))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alias::new("submissions")).to_owned())
            .await
    }
}
