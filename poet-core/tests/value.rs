#[cfg(test)]
mod tests {
    use poet_core::{AsValue, Value};
    use time::{Date, Month, PrimitiveDateTime, Time};
    use uuid::Uuid;

    #[test]
    fn value_null() {
        assert_eq!(Value::Null, Value::Null);
        assert_ne!(Value::Float32(Some(1.0)), Value::Null);
        assert!(Value::Varchar(None).is_null());
        assert!(!Value::Int32(Some(0)).is_null());
        assert!(Value::Int32(None).same_type(&Value::Int32(Some(7))));
        assert!(!Value::Int32(None).same_type(&Value::Int64(None)));
        assert_eq!(Value::Null.to_string(), "null");
        assert_eq!(Value::Int64(None).to_string(), "null");
    }

    #[test]
    fn value_bool() {
        let val: Value = true.into();
        assert_eq!(val, Value::Boolean(Some(true)));
        assert_ne!(val, Value::Boolean(Some(false)));
        assert_ne!(val, Value::Varchar(Some("true".into())));
        assert_eq!(bool::try_from_value(val).unwrap(), true);
        assert_eq!(bool::try_from_value(Value::Int32(Some(0))).unwrap(), false);
        assert_eq!(bool::try_from_value("true".into()).unwrap(), true);
    }

    #[test]
    fn value_integers() {
        let val: Value = 42i32.into();
        assert_eq!(val, Value::Int32(Some(42)));
        assert_eq!(i64::try_from_value(val).unwrap(), 42);
        assert_eq!(i32::try_from_value(Value::Int64(Some(-7))).unwrap(), -7);
        assert!(i32::try_from_value(Value::Int64(Some(i64::MAX))).is_err());
        assert_eq!(i64::try_from_value(" 123 ".into()).unwrap(), 123);
        assert!(i32::try_from_value("abc".into()).is_err());
        let error = i32::try_from_value(Value::Int32(None)).unwrap_err();
        assert!(error.to_string().contains("NULL"));
    }

    #[test]
    fn value_floats() {
        assert_eq!(f64::try_from_value(Value::Int32(Some(3))).unwrap(), 3.0);
        assert_eq!(f32::try_from_value(Value::Float64(Some(0.5))).unwrap(), 0.5);
        assert_eq!(Value::Float64(Some(1.25)).to_string(), "1.25");
    }

    #[test]
    fn value_string() {
        let val: Value = String::from("hello").into();
        assert_eq!(val, Value::Varchar(Some("hello".into())));
        assert_eq!(String::try_from_value(Value::Int64(Some(77))).unwrap(), "77");
        assert!(String::try_from_value(Value::Boolean(Some(true))).is_err());
        assert!(String::try_from_value(Value::Null).is_err());
    }

    #[test]
    fn value_date_time() {
        let date = Date::from_calendar_date(2024, Month::March, 9).unwrap();
        let timestamp = PrimitiveDateTime::new(date, Time::from_hms(7, 5, 30).unwrap());
        assert_eq!(Date::try_from_value("2024-03-09".into()).unwrap(), date);
        assert_eq!(
            PrimitiveDateTime::try_from_value("2024-03-09 07:05:30".into()).unwrap(),
            timestamp
        );
        assert_eq!(
            PrimitiveDateTime::try_from_value("2024-03-09T07:05:30".into()).unwrap(),
            timestamp
        );
        assert_eq!(
            PrimitiveDateTime::try_from_value(Value::Date(Some(date))).unwrap(),
            date.midnight()
        );
        assert_eq!(
            Date::try_from_value(Value::Timestamp(Some(timestamp))).unwrap(),
            date
        );
        assert_eq!(Value::Date(Some(date)).to_string(), "2024-03-09");
        assert_eq!(
            Value::Timestamp(Some(timestamp)).to_string(),
            "2024-03-09 07:05:30"
        );
    }

    #[test]
    fn value_option() {
        let val: Value = Option::<i32>::None.into();
        assert_eq!(val, Value::Int32(None));
        assert_eq!(Option::<i32>::try_from_value(Value::Null).unwrap(), None);
        assert_eq!(
            Option::<String>::try_from_value("x".into()).unwrap(),
            Some("x".to_string())
        );
        assert_eq!(
            Box::<i64>::try_from_value(Value::Int64(Some(5))).unwrap(),
            Box::new(5)
        );
    }

    #[test]
    fn value_uuid() {
        let id = Uuid::new_v4();
        let val: Value = id.into();
        assert_eq!(Uuid::try_from_value(val.clone()).unwrap(), id);
        assert_eq!(String::try_from_value(val).unwrap(), id.to_string());
        assert_eq!(
            Uuid::try_from_value(Value::Varchar(Some(id.to_string()))).unwrap(),
            id
        );
    }
}
