use sea_orm::sea_query::{Index, OnConflict, PostgresQueryBuilder};
use sea_orm::*;
use tracing::info;

use crate::config::GroupSeed;
use crate::entity::{comment, group, post};

/// Create configured groups whose slug does not exist yet.
pub async fn seed_groups(db: &DatabaseConnection, groups: &[GroupSeed]) -> Result<(), DbErr> {
    let mut inserted = 0u32;
    for seed in groups {
        let model = group::ActiveModel {
            title: Set(seed.title.clone()),
            slug: Set(seed.slug.clone()),
            description: Set(seed.description.clone()),
            ..Default::default()
        };

        let result = group::Entity::insert(model)
            .on_conflict(OnConflict::column(group::Column::Slug).do_nothing().to_owned())
            .exec_without_returning(db)
            .await;

        match result {
            Ok(_) => inserted += 1,
            Err(DbErr::RecordNotInserted) => {}
            Err(e) => return Err(e),
        }
    }

    if inserted > 0 {
        info!("Seeded {} new groups", inserted);
    }

    Ok(())
}

/// Ensure listing indexes exist.
///
/// Schema sync only creates single-column indexes, so the composite ones
/// used by the paginated listings are created here.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    let statements = [
        (
            "idx_post_pub_date",
            Index::create()
                .if_not_exists()
                .name("idx_post_pub_date")
                .table(post::Entity)
                .col(post::Column::PubDate)
                .col(post::Column::Id)
                .to_string(PostgresQueryBuilder),
        ),
        (
            "idx_post_author_pub_date",
            Index::create()
                .if_not_exists()
                .name("idx_post_author_pub_date")
                .table(post::Entity)
                .col(post::Column::AuthorId)
                .col(post::Column::PubDate)
                .to_string(PostgresQueryBuilder),
        ),
        (
            "idx_post_group_pub_date",
            Index::create()
                .if_not_exists()
                .name("idx_post_group_pub_date")
                .table(post::Entity)
                .col(post::Column::GroupId)
                .col(post::Column::PubDate)
                .to_string(PostgresQueryBuilder),
        ),
        (
            "idx_comment_post_created",
            Index::create()
                .if_not_exists()
                .name("idx_comment_post_created")
                .table(comment::Entity)
                .col(comment::Column::PostId)
                .col(comment::Column::Created)
                .to_string(PostgresQueryBuilder),
        ),
    ];

    for (name, stmt) in statements {
        match db.execute_unprepared(&stmt).await {
            Ok(_) => info!("Ensured index {} exists", name),
            Err(e) => tracing::warn!("Failed to create index {}: {}", name, e),
        }
    }

    Ok(())
}
