use anyhow::Result;
use entity::employee;
use products_hr::{
    CHIEF_ID, EmployeeUpdate, NewProduct, UpsertOutcome, create_product, list_business_units,
    list_employees, seed::{self, SeedConfig}, upsert_employee,
};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use suite_tests::PgScratch;
use uuid::Uuid;

#[tokio::test]
async fn seeded_directory_round_trips_on_postgres() -> Result<()> {
    let Some(scratch) = PgScratch::migrated().await? else {
        eprintln!("TEST_DATABASE_URL not set; skipping");
        return Ok(());
    };
    let db = &scratch.db;

    let report = seed::run(db, &SeedConfig::default()).await?;
    assert_eq!(report.employees(), 60);
    assert_eq!(list_business_units(db).await?, vec!["MVM", "MTech"]);
    assert_eq!(list_employees(db, None).await?.len(), 15);

    let managers = employee::Entity::find()
        .filter(employee::Column::Role.eq("manager"))
        .all(db)
        .await?;
    assert_eq!(managers.len(), 5);
    assert!(managers.iter().all(|m| m.superiors == Some(CHIEF_ID)));

    let developer = employee::Entity::find()
        .filter(employee::Column::Role.eq("developer"))
        .one(db)
        .await?
        .expect("seeded developers");
    let lead = employee::Entity::find_by_id(developer.superiors.expect("developer has a lead"))
        .one(db)
        .await?
        .expect("lead row exists");
    assert_eq!(developer.business_unit, lead.business_unit);

    let outcome = upsert_employee(
        db,
        &EmployeeUpdate {
            uuid: Uuid::now_v7().to_string(),
            lead_uuid: lead.id.to_string(),
            bid: "opex".into(),
            business_unit: "MVM".into(),
            capitalization: "1.0".into(),
            role: "developer".into(),
        },
    )
    .await;
    assert_eq!(outcome, UpsertOutcome::NotFound);

    create_product(
        db,
        &NewProduct {
            manager_uuid: Uuid::now_v7().to_string(),
            name: "Orphan".into(),
            jira_link: "https://jira.example/ORP".into(),
            domain: "Техплатформа".into(),
        },
    )
    .await?;
    assert_eq!(entity::product::Entity::find().count(db).await?, 1);

    scratch.cleanup().await
}
