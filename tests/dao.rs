mod common;

#[cfg(test)]
mod tests {
    use crate::common::{Audit, Item, MockExecutor, Note, PersonView, init_logs, row, text};
    use poet::{
        Binding, Dao, Entity, Error, MetadataStore, Result, RowLabeled, RowMappers, Select,
        SetterCache, Status, Value,
    };
    use std::{collections::HashMap, sync::Arc};
    use uuid::Uuid;

    fn dao<T: Entity + Default>() -> Dao<T, MockExecutor> {
        init_logs();
        Dao::with_store(
            MockExecutor::new(),
            Arc::new(MetadataStore::new()),
            Arc::new(SetterCache::new()),
        )
    }

    fn item(id: &str, name: &str) -> Item {
        Item {
            id: Some(id.into()),
            name: Some(name.into()),
        }
    }

    fn item_row(id: &str, name: &str) -> RowLabeled {
        row(&["ID", "NAME"], vec![text(id), text(name)])
    }

    #[test]
    fn get_by_id() {
        let mut dao = dao::<Item>();
        assert_eq!(dao.get("abc123").unwrap(), None);
        let query = dao.executor().last();
        assert_eq!(
            query.sql,
            "select ID as ID,NAME as NAME from T_ITEM AS T_ITEM where ID=?"
        );
        assert_eq!(query.params, [text("abc123")]);

        dao.executor_mut()
            .results
            .push_back(vec![item_row("abc123", "widget")]);
        assert_eq!(
            dao.get("abc123").unwrap(),
            Some(item("abc123", "widget"))
        );
        assert_eq!(dao.diagnostics().snapshot().columns_set, 2);
    }

    #[test]
    fn too_many_rows() {
        let mut dao = dao::<Item>();
        dao.executor_mut()
            .results
            .push_back(vec![item_row("a", "x"), item_row("b", "y")]);
        let error = dao.get("a").unwrap_err();
        assert!(error.is(Status::IncorrectResultSize));
        assert_eq!(error.args(), ["1", "2"]);
        assert_eq!(error.status().code(), 701);
    }

    #[test]
    fn object_projection() {
        let mut dao = dao::<Item>();
        dao.executor_mut()
            .results
            .push_back(vec![row(&["NAME"], vec![text("widget")])]);
        let found = dao
            .query_for_object(Some("name"), None, Some("{#id}=?"), &["a1".into()])
            .unwrap();
        assert_eq!(
            found,
            Some(Item {
                id: None,
                name: Some("widget".into()),
            })
        );
        assert_eq!(
            dao.executor().last().sql,
            "select NAME as NAME from T_ITEM AS T_ITEM where ID=?"
        );
    }

    #[test]
    fn create() {
        let mut dao = dao::<Item>();
        let affected = dao
            .create(&Item {
                id: None,
                name: Some("widget".into()),
            })
            .unwrap();
        assert_eq!(affected, 1);
        let query = dao.executor().last();
        assert_eq!(query.sql, "insert into T_ITEM(NAME) values (?)");
        assert_eq!(query.params, [text("widget")]);
    }

    #[test]
    fn create_with_id() {
        let mut dao = dao::<Item>();
        let mut entity = Item {
            id: None,
            name: Some("widget".into()),
        };
        dao.create_with_id(&mut entity).unwrap();
        let id = entity.id.clone().unwrap();
        assert!(id.starts_with("T_ITEM-"), "{id}");
        assert!(Uuid::parse_str(&id["T_ITEM-".len()..]).is_ok(), "{id}");
        let query = dao.executor().last();
        assert_eq!(query.sql, "insert into T_ITEM(ID,NAME) values (?,?)");
        assert_eq!(query.params, [text(&id), text("widget")]);

        let mut entity = item("given", "widget");
        dao.create_with_id(&mut entity).unwrap();
        assert_eq!(entity.id.as_deref(), Some("given"));
        assert_eq!(dao.executor().last().params[0], text("given"));
    }

    #[test]
    fn update() {
        let mut dao = dao::<Item>();
        dao.update_by_id(&item("a1", "renamed"), "a1").unwrap();
        let query = dao.executor().last();
        assert_eq!(query.sql, "update T_ITEM set ID=?,NAME=? where ID=?");
        assert_eq!(query.params, [text("a1"), text("renamed"), text("a1")]);

        dao.update_fields(&item("a1", "renamed"), "name", "a1")
            .unwrap();
        let query = dao.executor().last();
        assert_eq!(query.sql, "update T_ITEM set NAME=? where ID=?");
        assert_eq!(query.params, [text("renamed"), text("a1")]);

        dao.update_by_filter(&item("a1", "renamed"), "{#name} like ?", &["old%".into()])
            .unwrap();
        let query = dao.executor().last();
        assert_eq!(query.sql, "update T_ITEM set ID=?,NAME=? where NAME like ?");
        assert_eq!(query.params.len(), 3);

        let executed = dao.executor().queries.len();
        let error = dao
            .update_fields(&item("a1", "renamed"), " , ", "a1")
            .unwrap_err();
        assert!(error.is(Status::EmptyFieldListNotAllowed));
        assert_eq!(dao.executor().queries.len(), executed);
    }

    #[test]
    fn arguments_without_filter() {
        let mut dao = dao::<Item>();
        dao.update(&item("a1", "renamed"), Some("name"), None, None, &["a1".into()])
            .unwrap();
        let query = dao.executor().last();
        assert_eq!(query.sql, "update T_ITEM set NAME=?");
        assert_eq!(query.params, [text("renamed")]);

        dao.delete(Some("  "), &["a1".into()]).unwrap();
        let query = dao.executor().last();
        assert_eq!(query.sql, "delete from T_ITEM");
        assert!(query.params.is_empty());
    }

    #[test]
    fn missing_base() {
        let mut dao = dao::<Note>();
        let note = Note {
            id: Some("n1".into()),
            audit: None,
        };
        dao.create(&note).unwrap();
        let query = dao.executor().last();
        assert_eq!(query.sql, "insert into T_NOTE(ID) values (?)");
        assert_eq!(query.params, [text("n1")]);

        dao.update_by_id(&note, "n1").unwrap();
        let query = dao.executor().last();
        assert_eq!(query.sql, "update T_NOTE set ID=?,CREATED_BY=?,NAME=? where ID=?");
        assert_eq!(
            query.params,
            [text("n1"), Value::Varchar(None), Value::Varchar(None), text("n1")]
        );

        let note = Note {
            id: Some("n2".into()),
            audit: Some(Audit {
                created_by: Some("bob".into()),
                name: None,
            }),
        };
        dao.create(&note).unwrap();
        assert_eq!(
            dao.executor().last().sql,
            "insert into T_NOTE(ID,CREATED_BY) values (?,?)"
        );
    }

    #[test]
    fn delete() {
        let mut dao = dao::<Item>();
        dao.executor_mut().rows_affected = 4;
        assert_eq!(dao.delete_by_id("a1").unwrap(), 4);
        let query = dao.executor().last();
        assert_eq!(query.sql, "delete from T_ITEM where ID=?");
        assert_eq!(query.params, [text("a1")]);

        dao.delete(None, &[]).unwrap();
        assert_eq!(dao.executor().last().sql, "delete from T_ITEM");
    }

    #[test]
    fn count() {
        let mut dao = dao::<Item>();
        dao.executor_mut()
            .results
            .push_back(vec![row(&["COUNT(*)"], vec![Value::Int64(Some(3))])]);
        assert_eq!(dao.count(Some("{#name} like ?"), &["w%".into()]).unwrap(), 3);
        assert_eq!(
            dao.executor().last().sql,
            "select count(*) from T_ITEM AS T_ITEM where NAME like ?"
        );
        assert_eq!(dao.count(None, &[]).unwrap(), 0);
        assert_eq!(dao.executor().last().sql, "select count(*) from T_ITEM AS T_ITEM");
    }

    #[test]
    fn query_for_value() {
        let mut dao = dao::<Item>();
        dao.executor_mut()
            .results
            .push_back(vec![row(&["MAX"], vec![Value::Varchar(None)])]);
        assert_eq!(dao.query_for_value::<String>("max({#id})", None, &[]).unwrap(), None);
        assert_eq!(dao.executor().last().sql, "select max(ID) from T_ITEM AS T_ITEM");

        dao.executor_mut()
            .results
            .push_back(vec![row(&["MAX"], vec![text("zz")])]);
        let error = dao
            .query_for_value::<i64>("max({#id})", None, &[])
            .unwrap_err();
        assert!(error.is(Status::PropertyAccessFailure));
        assert_eq!(error.args(), ["i64", "max({#id})"]);
        assert!(error.cause().is_some());
    }

    #[test]
    fn list() {
        let mut dao = dao::<Item>();
        dao.executor_mut()
            .results
            .push_back(vec![item_row("a", "x"), item_row("b", "y")]);
        let items = dao.list(10, 5, Some("{#name}"), None, &[]).unwrap();
        assert_eq!(items, [item("a", "x"), item("b", "y")]);
        assert_eq!(
            dao.executor().last().sql,
            "select ID as ID,NAME as NAME from T_ITEM AS T_ITEM order by NAME limit 10,5"
        );
        assert_eq!(dao.diagnostics().snapshot().rows, 2);

        assert!(dao.list(0, 0, None, None, &[]).unwrap().is_empty());
        assert_eq!(
            dao.executor().last().sql,
            "select ID as ID,NAME as NAME from T_ITEM AS T_ITEM"
        );
    }

    #[test]
    fn list_by_object() {
        let mut dao = dao::<Item>();
        let object = HashMap::from([("name".to_string(), text("widget"))]);
        dao.query_for_list_by(
            &Select::new()
                .include("id")
                .filter("{#name}={'''' + name + ''''}"),
            &object,
        )
        .unwrap();
        let query = dao.executor().last();
        assert_eq!(query.sql, "select ID as ID from T_ITEM AS T_ITEM where NAME='widget'");
        assert!(query.params.is_empty());
    }

    #[derive(Default, Debug, PartialEq, Entity)]
    struct ItemName {
        name: Option<String>,
    }

    #[test]
    fn map_into_other_entity() {
        let mut dao = dao::<Item>();
        dao.executor_mut()
            .results
            .push_back(vec![item_row("a1", "widget")]);
        let found = dao.get_as::<ItemName>("a1").unwrap();
        assert_eq!(
            found,
            Some(ItemName {
                name: Some("widget".into())
            })
        );
        let counts = dao.diagnostics().snapshot();
        assert_eq!(counts.columns_set, 1);
        assert_eq!(counts.missing_setter, 1);
    }

    #[test]
    fn registered_mappers() {
        let mut dao = dao::<Item>();
        let error = dao
            .query_for_list_mapped::<String>(&Select::new(), Binding::Args(&[]))
            .unwrap_err();
        assert!(error.is(Status::MissingRowMapper));
        assert_eq!(error.status().code(), 10010001);
        assert!(dao.executor().queries.is_empty());

        let mut mappers = RowMappers::new();
        mappers.register::<String>(|row: &RowLabeled, index: usize| -> Result<String> {
            match row.get_column("NAME") {
                Some(Value::Varchar(Some(name))) => Ok(format!("{index}:{name}")),
                _ => Err(Error::new(Status::PropertyAccessFailure)),
            }
        });
        let mut dao = dao.with_mappers(mappers);
        assert_eq!(dao.mappers_mut().len(), 1);
        dao.executor_mut()
            .results
            .push_back(vec![item_row("a", "x"), item_row("b", "y")]);
        let names = dao
            .query_for_list_mapped::<String>(&Select::new().include("name"), Binding::Args(&[]))
            .unwrap();
        assert_eq!(names, ["0:x", "1:y"]);
    }

    #[test]
    fn database_failure() {
        let mut dao = dao::<Item>();
        dao.executor_mut().broken = true;
        let error = dao.delete_by_id("a1").unwrap_err();
        assert!(error.is(Status::Database));
        assert_eq!(error.status().code(), 902);
        assert_eq!(error.args(), ["delete from T_ITEM where ID=?"]);
        assert!(error.cause().is_some());
        assert!(dao.get("a1").is_err_and(|e| e.is(Status::Database)));
    }

    #[test]
    fn joined_entity() {
        let mut dao = dao::<PersonView>();
        let error = dao.create(&PersonView::default()).unwrap_err();
        assert!(error.is(Status::InvalidEntityDefinition));
        assert!(dao.executor().queries.is_empty());

        dao.query_for_list(&Select::new().include("name,addr$city"), &[])
            .unwrap();
        assert_eq!(
            dao.executor().last().sql,
            "select p.NAME as NAME,addr.CITY as ADDR$CITY from T_PERSON AS p,T_ADDRESS AS addr \
            where (p.ADDRESS_ID=addr.ID)"
        );
    }

    #[test]
    fn isolated_store() {
        let store = Arc::new(MetadataStore::new());
        let mut dao = Dao::<Item, _>::with_store(
            MockExecutor::new(),
            store.clone(),
            Arc::new(SetterCache::new()),
        );
        assert!(store.is_empty());
        dao.get("a1").unwrap();
        assert_eq!(store.len(), 1);
        assert!(Arc::ptr_eq(
            &dao.metadata().unwrap(),
            &store.definition_for::<Item>().unwrap()
        ));
        let executor = dao.into_executor();
        assert_eq!(executor.queries.len(), 1);
    }
}
