#[cfg(test)]
mod tests {
    use rowmap::{Catalog, Entity, OrmError, RowLabeled, SemanticType, Value};
    use time::{PrimitiveDateTime, macros::datetime};

    #[derive(Entity, Default, Debug, PartialEq)]
    #[rowmap(name = "users")]
    struct User {
        #[rowmap(primary_key)]
        id: i32,
        #[rowmap(name = "user_name")]
        name: String,
        age: i32,
    }

    #[derive(Entity, Default, Debug, PartialEq)]
    struct TownHall {
        #[rowmap(primary_key)]
        id: i64,
        _secret: Option<String>,
        r#type: u8,
        opened: Option<PrimitiveDateTime>,
    }

    #[test]
    fn descriptor() {
        let descriptor = User::descriptor();
        assert_eq!(User::table_name(), "users");
        let columns = descriptor.columns();
        assert_eq!(columns.len(), 3);

        assert_eq!(columns[0].name, "id");
        assert_eq!(columns[0].semantic_type, SemanticType::Integer);
        assert!(columns[0].primary_key);
        assert!(!columns[0].nullable);

        assert_eq!(columns[1].name, "user_name");
        assert_eq!(columns[1].semantic_type, SemanticType::Text);
        assert!(!columns[1].primary_key);

        assert_eq!(columns[2].name, "age");
        assert_eq!(descriptor.primary_key().unwrap().name(), "id");
        assert!(descriptor.validate("User").is_ok());
        assert!(std::ptr::eq(User::descriptor(), descriptor));
    }

    #[test]
    fn default_names() {
        assert_eq!(TownHall::table_name(), "town_hall");
        let columns = TownHall::descriptor()
            .columns()
            .iter()
            .map(|c| (c.name(), c.semantic_type, c.nullable))
            .collect::<Vec<_>>();
        assert_eq!(
            columns,
            [
                ("id", SemanticType::Integer, false),
                ("secret", SemanticType::Text, true),
                ("type", SemanticType::Integer, false),
                ("opened", SemanticType::Timestamp, true),
            ]
        );
    }

    #[test]
    fn field_access() {
        let mut user = User {
            id: 3,
            name: "ann".into(),
            age: 30,
        };
        assert_eq!(user.get("user_name").unwrap(), Value::Text("ann".into()));
        assert_eq!(user.primary_key_value().unwrap(), Value::Integer(3));
        user.set("age", Value::Integer(31)).unwrap();
        assert_eq!(user.age, 31);

        let error = user.get("name").unwrap_err();
        assert!(matches!(
            error.downcast_ref::<OrmError>(),
            Some(OrmError::Access { table, column, .. }) if table == "users" && column == "name"
        ));
        let error = user.set("age", Value::Text("old".into())).unwrap_err();
        assert!(matches!(
            error.downcast_ref::<OrmError>(),
            Some(OrmError::Access { column, .. }) if column == "age"
        ));
        assert_eq!(user.age, 31);
    }

    #[test]
    fn materialize() {
        let row = RowLabeled::new(
            ["id", "secret", "type", "opened"]
                .map(String::from)
                .into_iter()
                .collect(),
            [
                Value::Text("12".into()),
                Value::Null,
                Value::Integer(2),
                Value::Text("2021-06-30 23:15:00".into()),
            ]
            .into(),
        );
        let hall = TownHall::from_row(&row).unwrap();
        assert_eq!(
            hall,
            TownHall {
                id: 12,
                _secret: None,
                r#type: 2,
                opened: Some(datetime!(2021-06-30 23:15:00)),
            }
        );
    }

    #[test]
    fn materialize_failures() {
        let labels: rowmap::RowNames = ["id", "user_name"].map(String::from).into_iter().collect();
        let row = RowLabeled::new(labels, [Value::Integer(1), "ann".into()].into());
        let error = User::from_row(&row).unwrap_err();
        assert!(matches!(
            error.downcast_ref::<OrmError>(),
            Some(OrmError::Access { column, .. }) if column == "age"
        ));

        let labels: rowmap::RowNames = ["id", "user_name", "age"]
            .map(String::from)
            .into_iter()
            .collect();
        let row = RowLabeled::new(
            labels.clone(),
            [Value::Integer(1), "ann".into(), Value::Null].into(),
        );
        assert!(User::from_row(&row).is_err());

        let row = RowLabeled::new(
            labels,
            [Value::Integer(1), "ann".into(), "thirty".into()].into(),
        );
        let error = User::from_row(&row).unwrap_err();
        assert!(matches!(
            error.downcast_ref::<OrmError>(),
            Some(OrmError::Access { reason, .. }) if reason.contains("thirty")
        ));
    }

    #[test]
    fn catalog_validation() {
        #[derive(Entity, Default)]
        struct Note {
            body: String,
        }
        #[derive(Entity, Default)]
        #[rowmap(name = "users")]
        struct Customer {
            #[rowmap(primary_key)]
            id: i32,
        }

        let catalog = Catalog::builder()
            .register::<User>()
            .register::<TownHall>()
            .build()
            .unwrap();
        assert!(catalog.contains("users"));
        assert!(catalog.contains("town_hall"));

        let error = Catalog::builder().register::<Note>().build().unwrap_err();
        assert!(matches!(
            error.downcast_ref::<OrmError>(),
            Some(OrmError::Catalog { entity, reason })
                if entity == "Note" && reason.contains("primary key")
        ));

        let error = Catalog::builder()
            .register::<User>()
            .register::<Customer>()
            .build()
            .unwrap_err();
        assert!(matches!(
            error.downcast_ref::<OrmError>(),
            Some(OrmError::Catalog { entity, .. }) if entity == "Customer"
        ));
    }
}
