mod common;

#[cfg(test)]
mod tests {
    use crate::common::{Address, PersonView, text};
    use poet::{EntityMetadata, MetadataStore, Properties, Status, expression::resolve};
    use std::{collections::HashMap, sync::Arc};

    fn metadata() -> Arc<EntityMetadata> {
        MetadataStore::global()
            .definition_for::<PersonView>()
            .unwrap()
    }

    fn person() -> PersonView {
        PersonView {
            id: None,
            name: Some("Ann".into()),
            age: Some(30),
            addr: Address {
                street: None,
                city: Some("Rome".into()),
            },
        }
    }

    fn eval(template: &str, object: Option<&dyn Properties>) -> String {
        resolve(&metadata(), template, object).unwrap()
    }

    #[test]
    fn bindings() {
        assert_eq!(eval("{#name} like ?", None), "p.NAME like ?");
        assert_eq!(eval("{#addr.city}", None), "addr.CITY");
        assert_eq!(eval("{#addr$street}", None), "addr.STREET");
        assert_eq!(eval("{#age} desc, {#id}", None), "p.AGE desc, p.ID");
        assert_eq!(eval("no spans at all", None), "no spans at all");
    }

    #[test]
    fn properties() {
        let person = person();
        assert_eq!(
            eval("{#name}={'''' + name + ''''}", Some(&person)),
            "p.NAME='Ann'"
        );
        assert_eq!(eval("{addr.city}", Some(&person)), "Rome");
        assert_eq!(
            eval("{age >= 18 ? 'adult' : 'minor'}", Some(&person)),
            "adult"
        );
        assert_eq!(
            eval("{id == null ? 'new' : id}", Some(&person)),
            "new"
        );
        let map = HashMap::from([("limit".to_string(), text("5"))]);
        assert_eq!(eval("{#age} < {limit}", Some(&map)), "p.AGE < 5");
    }

    #[test]
    fn operators() {
        assert_eq!(eval("{2 + 3 * 4}", None), "14");
        assert_eq!(eval("{(2 + 3) * 4}", None), "20");
        assert_eq!(eval("{10 / 4.0}", None), "2.5");
        assert_eq!(eval("{7 % 3}", None), "1");
        assert_eq!(eval("{-(2 - 5)}", None), "3");
        assert_eq!(eval("{true && !false}", None), "true");
        assert_eq!(eval("{1 lt 2 and not (3 eq 4)}", None), "true");
        assert_eq!(eval("{'a' + 1}", None), "a1");
        assert_eq!(eval("{null}", None), "null");
        assert_eq!(eval("{\"it's\"}", None), "it's");
    }

    #[test]
    fn braces_in_strings() {
        let person = person();
        assert_eq!(eval("{'}' + name + '{'}", Some(&person)), "}Ann{");
        assert_eq!(eval("x } y", None), "x } y");
    }

    #[test]
    fn failures() {
        let person = person();
        let templates = [
            "{#nickname} = ?",
            "{nickname}",
            "{#name",
            "{'unterminated}",
            "{1 +}",
            "{1 / 0}",
            "{}",
            "{name ? 1 : 2}",
        ];
        for template in templates {
            let error = resolve(&metadata(), template, Some(&person)).unwrap_err();
            assert!(error.is(Status::ExpressionEvaluationFailure), "{template}");
            assert_eq!(error.args(), [template]);
            assert!(error.cause().is_some());
        }
        let error = resolve(&metadata(), "{name}", None).unwrap_err();
        assert!(error.is(Status::ExpressionEvaluationFailure));
        assert_eq!(error.status().code(), 602);
    }
}
