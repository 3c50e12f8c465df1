use crate::{Town, User};
use rowmap::{
    Catalog, Config, Connection, Driver, Executor, OrmError, Query, Session, SqlWriter, Strategy,
    stream::TryStreamExt,
};
use time::macros::datetime;

/// Rebuild the schema, then exercise every persistence operation on it.
pub async fn lifecycle<C: Connection>(mut connection: C, schema: &str) -> C {
    let writer = connection.driver().sql_writer();

    // A table unknown to the catalog
    let mut sql = String::new();
    writer.write_create_schema(&mut sql, schema);
    connection
        .execute(Query::raw(sql))
        .await
        .expect("Failed to create the schema");
    let mut sql = String::from("CREATE TABLE IF NOT EXISTS ");
    writer.write_table_ref(&mut sql, schema, "leftovers");
    sql.push_str("(id INT)");
    connection
        .execute(Query::raw(sql))
        .await
        .expect("Failed to create the leftovers table");
    let leftovers = connection
        .fetch(writer.write_table_exists_query(schema, "leftovers"))
        .try_collect::<Vec<_>>()
        .await
        .expect("Failed to look for the leftovers table");
    assert_eq!(leftovers.len(), 1, "The leftovers table was not created");

    let catalog = Catalog::builder()
        .register::<User>()
        .register::<Town>()
        .build()
        .expect("The test entities must be valid");
    let session = Session::open(
        connection,
        Config::new(schema, Strategy::DropCreate),
        catalog.clone(),
    )
    .await;
    assert!(
        session.is_ok(),
        "Failed to open the session with full-rebuild: {:?}",
        session.err()
    );
    let mut session = session.unwrap();
    let leftovers = session
        .executor_mut()
        .fetch(writer.write_table_exists_query(schema, "leftovers"))
        .try_collect::<Vec<_>>()
        .await
        .expect("Failed to look for the leftovers table");
    assert!(
        leftovers.is_empty(),
        "The full rebuild must drop tables unknown to the catalog"
    );

    // Insert
    let mut ann = User {
        id: 0,
        name: "ann".into(),
        age: 30,
        registration_date: Some(datetime!(2024-03-05 14:07:09)),
        address: None,
    };
    let result = session.persist(&mut ann).await;
    assert!(
        matches!(result, Ok(true)),
        "Failed to insert ann: {:?}",
        result
    );
    assert!(ann.id > 0, "The generated key was not assigned");

    let found = session
        .find_first_where::<User>("user_name = 'ann'")
        .await
        .expect("Failed to read ann back");
    assert_eq!(found.as_ref(), Some(&ann));

    // Update
    ann.age = 31;
    ann.address = Some("Sofia".into());
    let result = session.persist(&mut ann).await;
    assert!(matches!(result, Ok(true)), "Failed to update ann: {:?}", result);
    let found = session
        .find_first_where::<User>(&format!("id = {}", ann.id))
        .await
        .expect("Failed to read ann after the update");
    assert_eq!(found, Some(ann.clone()));

    // Saving the same values again is still a success
    let result = session.persist(&mut ann).await;
    assert!(
        matches!(result, Ok(true)),
        "Failed to persist ann unchanged: {:?}",
        result
    );

    // Nothing matches
    let result = session.find_first_where::<User>("id = 100000").await;
    assert!(matches!(result, Ok(None)), "Expected no user: {:?}", result);

    // Several rows
    for name in ["Sofia", "Plovdiv", "Varna"] {
        let mut town = Town {
            id: 0,
            name: name.into(),
        };
        session
            .persist(&mut town)
            .await
            .expect("Failed to insert a town");
    }
    let towns = session
        .find_where::<Town>("id BETWEEN 1 AND 10")
        .await
        .expect("Failed to read the towns");
    assert_eq!(
        towns.iter().map(|v| v.name.as_str()).collect::<Vec<_>>(),
        ["Sofia", "Plovdiv", "Varna"]
    );

    // The database rejects the predicate
    let result = session.find_where::<Town>("name LIKE").await;
    assert!(
        matches!(
            result.as_ref().map_err(|e| e.downcast_ref::<OrmError>()),
            Err(Some(OrmError::SqlExecution { .. }))
        ),
        "Expected a statement failure: {:?}",
        result
    );

    // Delete
    let result = session.delete(&Town::default()).await;
    assert!(
        matches!(
            result.as_ref().map_err(|e| e.downcast_ref::<OrmError>()),
            Err(Some(OrmError::MissingKey { .. }))
        ),
        "Expected a missing key: {:?}",
        result
    );
    session
        .delete(&ann)
        .await
        .expect("Failed to delete ann");
    let users = session.find::<User>().await.expect("Failed to read users");
    assert!(users.is_empty());

    // Opening again with the incremental strategy keeps the data
    let session = Session::open(
        session.into_inner(),
        Config::new(schema, Strategy::Update),
        catalog,
    )
    .await;
    assert!(
        session.is_ok(),
        "Failed to open the session with incremental-update: {:?}",
        session.err()
    );
    let mut session = session.unwrap();
    let towns = session.find::<Town>().await.expect("Failed to read the towns");
    assert_eq!(towns.len(), 3);
    let first = session
        .find_first::<Town>()
        .await
        .expect("Failed to read the first town");
    assert!(first.is_some());
    session.into_inner()
}
