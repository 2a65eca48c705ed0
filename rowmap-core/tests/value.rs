#[cfg(test)]
mod tests {
    use rowmap_core::{AsValue, Value};
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use time::{
        Date, OffsetDateTime, PrimitiveDateTime, Time,
        macros::{date, datetime, time},
    };
    use uuid::Uuid;

    #[test]
    fn nulls_and_zeros() {
        assert!(Value::Null.is_null());
        assert!(Value::Int32(None).is_null());
        assert!(!Value::Int32(Some(0)).is_null());

        for value in [
            Value::Null,
            Value::Boolean(Some(false)),
            Value::Int8(Some(0)),
            Value::UInt64(None),
            Value::Float64(Some(0.0)),
            Value::Decimal(Some(Decimal::ZERO), 10, 2),
            Value::Varchar(Some(String::new())),
            Value::Blob(Some(Box::default())),
            Value::Date(Some(date!(1970 - 01 - 01))),
            Value::Time(Some(Time::MIDNIGHT)),
            Value::Timestamp(Some(datetime!(1970-01-01 0:00))),
            Value::TimestampWithTimezone(Some(OffsetDateTime::UNIX_EPOCH)),
            Value::Uuid(Some(Uuid::nil())),
        ] {
            assert!(value.is_zero(), "{value:?} is zero");
            assert!(value.zeroed().is_zero());
            assert!(value.zeroed().same_type(&value));
            assert!(value.as_null().is_null());
            assert!(value.as_null().same_type(&value));
        }
        for value in [
            Value::Boolean(Some(true)),
            Value::Int16(Some(-1)),
            Value::Varchar(Some("a".into())),
            Value::Date(Some(date!(2000 - 01 - 01))),
            Value::Uuid(Some(Uuid::from_u128(1))),
        ] {
            assert!(!value.is_zero(), "{value:?} is not zero");
        }
    }

    #[test]
    fn equality() {
        assert_eq!(Value::Null, Value::Null);
        assert_ne!(Value::Int32(Some(1)), Value::Int64(Some(1)));
        assert_ne!(Value::Int32(None), Value::Null);
        assert_eq!(
            Value::Decimal(Some(Decimal::new(125, 2)), 10, 2),
            Value::Decimal(Some(Decimal::new(125, 2)), 0, 0),
            "Precision and scale are not compared"
        );
        assert!(Value::Varchar(None).same_type(&Value::Varchar(Some("x".into()))));
        assert!(!Value::Varchar(None).same_type(&Value::Blob(None)));
        assert_eq!(Value::from("x"), Value::Varchar(Some("x".into())));
        assert_eq!(Value::from(Some(5u16)), Value::UInt16(Some(5)));
        assert_eq!(Value::from(None::<u16>), Value::UInt16(None));
    }

    #[test]
    fn integers() {
        assert!(Value::UInt8(None).is_integer());
        assert!(!Value::Float32(None).is_integer());
        assert!(Value::UInt8(None).is_unsigned());
        assert!(!Value::Int8(None).is_unsigned());
        assert_eq!(Value::UInt32(Some(7)).as_i64(), Some(7));
        assert_eq!(Value::UInt64(Some(u64::MAX)).as_i64(), None);
        assert_eq!(Value::Varchar(Some("7".into())).as_i64(), None);

        assert_eq!(Value::Int8(None).with_integer(100).unwrap(), Value::Int8(Some(100)));
        assert_eq!(Value::UInt32(None).with_integer(5).unwrap(), Value::UInt32(Some(5)));
        assert!(Value::Int8(None).with_integer(300).is_err());
        assert!(Value::UInt16(None).with_integer(-1).is_err());
        assert!(Value::Varchar(None).with_integer(1).is_err());
    }

    #[test]
    fn points_in_time() {
        let instant = datetime!(2024-03-01 10:20:30.456 +2);
        assert!(Value::Int32(None).is_time());
        assert!(Value::Timestamp(None).is_time());
        assert!(!Value::Int16(None).is_time());
        assert!(!Value::Date(None).is_time());
        assert_eq!(
            Value::TimestampWithTimezone(None).with_time(instant).unwrap(),
            Value::TimestampWithTimezone(Some(instant))
        );
        assert_eq!(
            Value::Timestamp(None).with_time(instant).unwrap(),
            Value::Timestamp(Some(datetime!(2024-03-01 8:20:30.456)))
        );
        assert_eq!(
            Value::Int64(None).with_time(instant).unwrap(),
            Value::Int64(Some(instant.unix_timestamp() * 1000 + 456))
        );
        assert_eq!(
            Value::Int32(None).with_time(instant).unwrap(),
            Value::Int32(Some(instant.unix_timestamp() as i32))
        );
        assert!(Value::Varchar(None).with_time(instant).is_err());
    }

    #[test]
    fn bytes() {
        assert_eq!(Value::Blob(Some([1, 2].into())).as_bytes().unwrap(), Some(&[1u8, 2][..]));
        assert_eq!(
            Value::Varchar(Some("ab".into())).as_bytes().unwrap(),
            Some(&b"ab"[..])
        );
        assert_eq!(Value::Blob(None).as_bytes().unwrap(), None);
        assert_eq!(Value::Null.as_bytes().unwrap(), None);
        assert!(Value::Int32(Some(1)).as_bytes().is_err());
    }

    #[test]
    fn integer_conversions() {
        assert_eq!(i64::try_from_value(Value::Int8(Some(-3))).unwrap(), -3);
        assert_eq!(u8::try_from_value(Value::Int64(Some(200))).unwrap(), 200);
        assert_eq!(i32::try_from_value(Value::Boolean(Some(true))).unwrap(), 1);
        assert_eq!(i64::try_from_value(Value::Varchar(Some(" 42 ".into()))).unwrap(), 42);
        assert_eq!(
            i32::try_from_value(Value::Decimal(Some(Decimal::new(1200, 2)), 0, 2)).unwrap(),
            12
        );
        let error = i16::try_from_value(Value::Int64(Some(70000))).unwrap_err();
        assert!(format!("{error:#}").contains("70000"));
        assert!(u32::try_from_value(Value::Int32(Some(-1))).is_err());
        assert!(i32::try_from_value(Value::Decimal(Some(Decimal::new(15, 1)), 0, 1)).is_err());
        assert!(i32::try_from_value(Value::Varchar(Some("x".into()))).is_err());
        assert!(i32::try_from_value(Value::Float64(Some(1.0))).is_err());
        assert!(i32::try_from_value(Value::Int32(None)).is_err());
    }

    #[test]
    fn scalar_conversions() {
        assert!(bool::try_from_value(Value::Int64(Some(2))).unwrap());
        assert!(bool::try_from_value(Value::Varchar(Some("T".into()))).unwrap());
        assert!(!bool::try_from_value(Value::Varchar(Some("0".into()))).unwrap());
        assert!(bool::try_from_value(Value::Varchar(Some("yes".into()))).is_err());

        assert_eq!(f64::try_from_value(Value::Float32(Some(1.5))).unwrap(), 1.5);
        assert_eq!(f32::try_from_value(Value::Int64(Some(3))).unwrap(), 3.0);
        assert_eq!(
            f64::try_from_value(Value::Decimal(Some(Decimal::new(25, 1)), 0, 1)).unwrap(),
            2.5
        );
        assert_eq!(f64::try_from_value(Value::Varchar(Some("0.25".into()))).unwrap(), 0.25);

        assert_eq!(
            String::try_from_value(Value::Blob(Some(b"hi".to_vec().into()))).unwrap(),
            "hi"
        );
        assert!(String::try_from_value(Value::Blob(Some(vec![0xff].into()))).is_err());
        assert_eq!(Vec::<u8>::try_from_value(Value::Varchar(Some("a".into()))).unwrap(), b"a");

        let decimal = Decimal::from_str("12.50").unwrap();
        assert_eq!(decimal.as_value(), Value::Decimal(Some(decimal), 0, 2));
        assert_eq!(
            Decimal::try_from_value(Value::Varchar(Some("12.50".into()))).unwrap(),
            decimal
        );
        assert_eq!(
            Decimal::try_from_value(Value::Int32(Some(7))).unwrap(),
            Decimal::from(7)
        );

        let uuid = Uuid::from_u128(0x1234);
        assert_eq!(Uuid::try_from_value(Value::Varchar(Some(uuid.to_string()))).unwrap(), uuid);
        assert_eq!(
            Uuid::try_from_value(Value::Blob(Some(uuid.as_bytes().to_vec().into()))).unwrap(),
            uuid
        );
        assert_eq!(String::try_from_value(uuid.as_value()).unwrap(), uuid.to_string());
        assert!(Uuid::try_from_value(Value::Varchar(Some("not a uuid".into()))).is_err());
    }

    #[test]
    fn optional_conversions() {
        assert_eq!(Option::<i32>::as_empty_value(), Value::Int32(None));
        assert_eq!(Option::<i32>::try_from_value(Value::Int32(None)).unwrap(), None);
        assert_eq!(Option::<i32>::try_from_value(Value::Null).unwrap(), None);
        assert_eq!(Option::<i32>::try_from_value(Value::Int64(Some(4))).unwrap(), Some(4));
        assert_eq!(Some(String::from("a")).as_value(), Value::Varchar(Some("a".into())));
    }

    #[test]
    fn temporal_conversions() {
        assert_eq!(<Date as AsValue>::parse("2024-02-29").unwrap(), date!(2024 - 02 - 29));
        assert!(<Date as AsValue>::parse("2023-02-29").is_err());
        assert_eq!(
            Date::try_from_value(Value::Timestamp(Some(datetime!(2024-02-29 23:00)))).unwrap(),
            date!(2024 - 02 - 29)
        );

        assert_eq!(<Time as AsValue>::parse("10:20").unwrap(), time!(10:20));
        assert_eq!(<Time as AsValue>::parse("10:20:30").unwrap(), time!(10:20:30));
        assert_eq!(
            <Time as AsValue>::parse("10:20:30.25").unwrap(),
            time!(10:20:30.25)
        );

        assert_eq!(
            <PrimitiveDateTime as AsValue>::parse("2024-01-02 03:04:05.5").unwrap(),
            datetime!(2024-01-02 03:04:05.5)
        );
        assert_eq!(
            <PrimitiveDateTime as AsValue>::parse("2024-01-02T03:04").unwrap(),
            datetime!(2024-01-02 03:04)
        );
        assert_eq!(
            <PrimitiveDateTime as AsValue>::parse("2024-01-02T03:04:05+02:00").unwrap(),
            datetime!(2024-01-02 01:04:05),
            "Offsets are converted to UTC"
        );
        assert!(<PrimitiveDateTime as AsValue>::parse("yesterday").is_err());

        assert_eq!(
            <OffsetDateTime as AsValue>::parse("2024-01-02T03:04:05+02:00").unwrap(),
            datetime!(2024-01-02 03:04:05 +2)
        );
        assert_eq!(
            <OffsetDateTime as AsValue>::parse("2024-01-02 03:04:05").unwrap(),
            datetime!(2024-01-02 03:04:05 UTC)
        );
        assert_eq!(
            OffsetDateTime::try_from_value(Value::Timestamp(Some(datetime!(2024-01-02 03:04))))
                .unwrap(),
            datetime!(2024-01-02 03:04 UTC)
        );
        assert_eq!(
            PrimitiveDateTime::try_from_value(Value::Varchar(Some("2024-01-02 03:04:05".into())))
                .unwrap(),
            datetime!(2024-01-02 03:04:05)
        );
        assert!(Time::try_from_value(Value::Int64(Some(1))).is_err());

        // Text read back from drivers storing temporal values as strings
        assert_eq!(
            Date::try_from_value(Value::Varchar(Some("2024-05-06".into()))).unwrap(),
            date!(2024 - 05 - 06)
        );
        assert_eq!(
            Time::try_from_value(Value::Varchar(Some("07:08:09".into()))).unwrap(),
            time!(07:08:09)
        );
        assert_eq!(
            OffsetDateTime::try_from_value(Value::Varchar(Some("2024-05-06T07:08:09Z".into())))
                .unwrap(),
            datetime!(2024-05-06 07:08:09 UTC)
        );
        assert!(Date::try_from_value(Value::Varchar(Some("May 6".into()))).is_err());
    }
}
