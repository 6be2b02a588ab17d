use sea_orm_migration::prelude::*;

use crate::Migration;

pub(crate) fn migrations() -> Vec<Migration> {
    let mut insert = Query::insert();
    insert
        .into_table(Semesters::Table)
        .columns([Semesters::Name])
        .on_conflict(OnConflict::column(Semesters::Name).do_nothing().to_owned());

    for n in 1..=8 {
        insert.values_panic([format!("Semester {n}").into()]);
    }

    vec![Migration::new("seed_semesters", insert.to_owned())]
}

#[derive(DeriveIden)]
enum Semesters {
    Table,
    Name,
}
