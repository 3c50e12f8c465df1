#[cfg(test)]
mod tests {
    use rowmap::{Catalog, Config, Entity, InsertMode, OrmError, Session, Strategy, Value};
    use rowmap_tests::{RecordingExecutor, Reply, init_logs};
    use time::{PrimitiveDateTime, macros::datetime};

    #[derive(Entity, Default, Debug, Clone, PartialEq)]
    #[rowmap(name = "users")]
    struct User {
        #[rowmap(primary_key)]
        id: i32,
        user_name: String,
        age: i32,
    }

    #[derive(Entity, Debug, Clone, PartialEq)]
    #[rowmap(name = "events")]
    struct Event {
        #[rowmap(primary_key)]
        id: Option<i64>,
        title: String,
        happened: PrimitiveDateTime,
    }

    impl Default for Event {
        fn default() -> Self {
            Self {
                id: None,
                title: String::new(),
                happened: datetime!(1970-01-01 00:00:00),
            }
        }
    }

    #[derive(Entity, Default, Debug)]
    struct Unregistered {
        #[rowmap(primary_key)]
        id: i32,
    }

    /// Maps the table of `User` without being registered.
    #[derive(Entity, Default, Debug)]
    #[rowmap(name = "users")]
    struct Member {
        #[rowmap(primary_key)]
        id: i32,
        user_name: String,
    }

    async fn open(insert_mode: InsertMode) -> Session<RecordingExecutor> {
        init_logs();
        let catalog = Catalog::builder()
            .register::<User>()
            .register::<Event>()
            .build()
            .unwrap();
        let mut session = Session::open(
            RecordingExecutor::new(),
            Config::new("db", Strategy::DropCreate).insert_mode(insert_mode),
            catalog,
        )
        .await
        .expect("Could not open the session");
        session.executor_mut().clear();
        session
    }

    fn ann() -> User {
        User {
            id: 0,
            user_name: "ann".into(),
            age: 30,
        }
    }

    #[tokio::test]
    async fn insert_literal() {
        let mut session = open(InsertMode::Literal).await;
        session
            .executor_mut()
            .reply("INSERT INTO", Reply::affected(1, Some(7)));
        let mut user = ann();
        assert!(session.persist(&mut user).await.unwrap());
        let queries = session.executor().queries();
        assert_eq!(queries.len(), 1);
        assert_eq!(
            queries[0].sql,
            "INSERT INTO db.users(user_name, age) VALUES('ann','30')"
        );
        assert!(queries[0].params.is_empty());
        assert_eq!(user.id, 7);
    }

    #[tokio::test]
    async fn insert_bound() {
        let mut session = open(InsertMode::Bound).await;
        let mut event = Event {
            id: None,
            title: "it's open".into(),
            happened: datetime!(2024-05-01 18:30:00),
        };
        assert!(session.persist(&mut event).await.unwrap());
        let query = &session.executor().queries()[0];
        assert_eq!(
            query.sql,
            "INSERT INTO db.events(title, happened) VALUES(?,?)"
        );
        assert_eq!(
            query.params,
            [
                Value::Text("it's open".into()),
                Value::Timestamp(datetime!(2024-05-01 18:30:00)),
            ]
        );
        // No generated id reported
        assert_eq!(event.id, None);
    }

    #[tokio::test]
    async fn literal_timestamps_and_quotes() {
        let mut session = open(InsertMode::Literal).await;
        let mut event = Event {
            id: Some(-1),
            title: "it's open".into(),
            happened: datetime!(2024-05-01 18:30:00),
        };
        session.persist(&mut event).await.unwrap();
        assert_eq!(
            session.executor().statements(),
            ["INSERT INTO db.events(title, happened) VALUES('it''s open','2024-05-01 18:30:00')"]
        );
    }

    #[tokio::test]
    async fn update() {
        let mut session = open(InsertMode::Literal).await;
        let mut user = User { id: 3, ..ann() };
        assert!(session.persist(&mut user).await.unwrap());
        let query = &session.executor().queries()[0];
        assert_eq!(
            query.sql,
            "UPDATE db.users SET user_name = ?, age = ? WHERE id = ?"
        );
        assert_eq!(query.sql.matches('?').count(), 3);
        assert_eq!(
            query.params,
            [Value::Text("ann".into()), Value::Integer(30), Value::Integer(3)]
        );
        assert_eq!(user.id, 3);

        session
            .executor_mut()
            .reply("UPDATE", Reply::affected(0, None));
        assert!(!session.persist(&mut user).await.unwrap());
    }

    #[tokio::test]
    async fn find_first() {
        let mut session = open(InsertMode::Bound).await;
        let found = session
            .find_first_where::<User>("user_name = 'ann'")
            .await
            .unwrap();
        assert_eq!(found, None);
        assert_eq!(
            session.executor().statements(),
            ["SELECT * FROM db.users WHERE user_name = 'ann' LIMIT 1"]
        );

        session.executor_mut().reply(
            "SELECT * FROM db.users",
            Reply::rows(
                &["id", "user_name", "age"],
                [vec![Value::from("4"), Value::from("ann"), Value::from("30")]],
            ),
        );
        let found = session
            .find_first_where::<User>("user_name = 'ann'")
            .await
            .unwrap();
        assert_eq!(
            found,
            Some(User {
                id: 4,
                user_name: "ann".into(),
                age: 30
            })
        );
        assert!(session.find_first::<User>().await.unwrap().is_some());
        assert_eq!(
            session.executor().statements().last(),
            Some(&"SELECT * FROM db.users LIMIT 1")
        );
    }

    #[tokio::test]
    async fn find() {
        let mut session = open(InsertMode::Bound).await;
        session.executor_mut().reply(
            "FROM db.events",
            Reply::rows(
                &["id", "title", "happened"],
                [
                    vec![
                        Value::Integer(1),
                        "a".into(),
                        Value::Timestamp(datetime!(2020-01-01 00:00:00)),
                    ],
                    vec![Value::Integer(2), "b".into(), "2020-02-01 13:00:00".into()],
                ],
            ),
        );
        let events = session.find_where::<Event>("  ").await.unwrap();
        assert_eq!(
            events.iter().map(|v| v.id).collect::<Vec<_>>(),
            [Some(1), Some(2)]
        );
        assert_eq!(events[1].happened, datetime!(2020-02-01 13:00:00));
        let events = session.find::<Event>().await.unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(
            session.executor().statements(),
            ["SELECT * FROM db.events", "SELECT * FROM db.events"]
        );
    }

    #[tokio::test]
    async fn malformed_predicate() {
        let mut session = open(InsertMode::Bound).await;
        session
            .executor_mut()
            .reply("WHERE age >", Reply::Fail("You have an error in your SQL syntax".into()));
        let error = session.find_where::<User>("age >").await.unwrap_err();
        assert!(matches!(
            error.downcast_ref::<OrmError>(),
            Some(OrmError::SqlExecution { sql, .. }) if sql == "SELECT * FROM db.users WHERE age >"
        ));
        assert!(format!("{:#}", error).contains("While running the query"));
    }

    #[tokio::test]
    async fn delete() {
        let mut session = open(InsertMode::Literal).await;
        session.delete(&User { id: 5, ..ann() }).await.unwrap();
        assert_eq!(
            session.executor().statements(),
            ["DELETE FROM db.users WHERE id = 5"]
        );

        let mut session = open(InsertMode::Bound).await;
        session.delete(&User { id: 5, ..ann() }).await.unwrap();
        let query = &session.executor().queries()[0];
        assert_eq!(query.sql, "DELETE FROM db.users WHERE id = ?");
        assert_eq!(query.params, [Value::Integer(5)]);
    }

    #[tokio::test]
    async fn delete_without_key() {
        let mut session = open(InsertMode::Literal).await;
        for user in [ann(), User { id: -2, ..ann() }] {
            let error = session.delete(&user).await.unwrap_err();
            assert_eq!(
                error.downcast_ref::<OrmError>(),
                Some(&OrmError::MissingKey {
                    table: "users".into(),
                    column: "id".into(),
                })
            );
        }
        let error = session.delete(&Event::default()).await.unwrap_err();
        assert!(matches!(
            error.downcast_ref::<OrmError>(),
            Some(OrmError::MissingKey { table, .. }) if table == "events"
        ));
        assert!(session.executor().queries().is_empty());
    }

    #[tokio::test]
    async fn unregistered_entity() {
        let mut session = open(InsertMode::Bound).await;
        let error = session.find::<Unregistered>().await.unwrap_err();
        assert!(matches!(
            error.downcast_ref::<OrmError>(),
            Some(OrmError::Configuration(..))
        ));
        let error = session
            .persist(&mut Unregistered::default())
            .await
            .unwrap_err();
        assert!(matches!(
            error.downcast_ref::<OrmError>(),
            Some(OrmError::Configuration(..))
        ));
        let error = session.find::<Member>().await.unwrap_err();
        assert!(matches!(
            error.downcast_ref::<OrmError>(),
            Some(OrmError::Configuration(..))
        ));
        let error = session
            .delete(&Member {
                id: 4,
                user_name: "ann".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(
            error.downcast_ref::<OrmError>(),
            Some(OrmError::Configuration(..))
        ));
        assert!(session.executor().queries().is_empty());
    }

    #[tokio::test]
    async fn invalid_config() {
        let result = Session::open(
            RecordingExecutor::new(),
            Config::new("my db", Strategy::Update),
            Catalog::default(),
        )
        .await;
        let Err(error) = result else {
            panic!("The schema name should be rejected");
        };
        assert!(matches!(
            error.downcast_ref::<OrmError>(),
            Some(OrmError::Configuration(..))
        ));
    }

    #[tokio::test]
    async fn into_inner() {
        let session = open(InsertMode::Bound).await;
        assert_eq!(session.config().schema, "db");
        assert_eq!(session.catalog().len(), 2);
        let executor = session.into_inner();
        assert!(executor.queries().is_empty());
    }
}
