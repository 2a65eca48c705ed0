#[cfg(test)]
mod tests {
    use rowmap_core::{
        AsValue, Encoding, FieldKind, Options, RecordType, Tag, Value, normalize, parse_options,
    };
    use std::any::TypeId;

    static NESTED: RecordType = RecordType {
        name: "Nested",
        table: "nested",
        type_id: TypeId::of::<()>,
        fields: &[],
    };

    fn nested() -> &'static RecordType {
        &NESTED
    }

    fn scalar<T: AsValue>() -> FieldKind {
        FieldKind::Scalar {
            prototype: T::as_empty_value,
            normalize: normalize::<T>,
            nullable: false,
        }
    }

    const RECORD: FieldKind = FieldKind::Record {
        target: nested,
        optional: false,
    };

    const RECORDS: FieldKind = FieldKind::Many {
        target: nested,
        key: None,
    };

    fn parse(kind: &FieldKind, tag: &str) -> Tag {
        parse_options(kind, tag).expect("The tag should parse")
    }

    fn error(kind: &FieldKind, tag: &str) -> String {
        let error = parse_options(kind, tag).expect_err("The tag should be rejected");
        format!("{error:#}")
    }

    #[test]
    fn aliases_and_options() {
        assert_eq!(parse(&scalar::<i64>(), ""), Tag::default());
        assert_eq!(parse(&scalar::<i64>(), "user_id").alias, "user_id");

        let tag = parse(&scalar::<i64>(), "id,primary_key,auto_increment");
        assert_eq!(tag.alias, "id");
        assert_eq!(tag.options, Options::PRIMARY_KEY | Options::AUTO_INCREMENT);
        assert!(tag.options.is_auto());
        assert_eq!(tag.size, 0);

        let tag = parse(&scalar::<String>(), ",unique,size=16");
        assert_eq!(tag.alias, "");
        assert!(tag.options.contains(Options::UNIQUE | Options::SIZE));
        assert_eq!(tag.size, 16);

        let tag = parse(&scalar::<i64>(), ",auto_now_add,collapse");
        assert!(tag.options.contains(Options::AUTO_NOW_ADD));
        assert!(tag.options.contains(Options::COLLAPSE));

        assert_eq!(
            parse(&scalar::<String>(), ",json").options.encoding(),
            Some(Encoding::Json)
        );
        assert_eq!(
            parse(&FieldKind::Encoded { nullable: false }, ",gob").options.encoding(),
            Some(Encoding::Gob)
        );
        assert_eq!(
            parse(&FieldKind::Encoded { nullable: true }, ",xml,size=4000").size,
            4000
        );
    }

    #[test]
    fn relations() {
        assert!(parse(&RECORD, ",inline").options.is_inline());
        assert!(parse(&RECORD, "home_,inline_static").options.is_inline());
        assert!(parse(&RECORD, ",foreign_key").options.is_one());
        assert!(parse(&RECORD, "owner,many_to_one").options.is_one());
        assert!(parse(&RECORDS, ",one_to_many").options.is_many());
        assert!(parse(&RECORDS, ",many_to_many").options.is_many());
        assert!(!parse(&RECORDS, "").options.contains(Options::MAP));

        let map = FieldKind::Many {
            target: nested,
            key: Some(<i64 as AsValue>::as_empty_value),
        };
        assert!(parse(&map, "").options.contains(Options::MAP));
        assert!(parse(&map, ",one_to_many").options.contains(Options::MAP | Options::ONE_TO_MANY));
    }

    #[test]
    fn rejected_tags() {
        assert!(error(&scalar::<i64>(), ",foo").contains("unsupported option: foo"));
        assert!(error(&scalar::<i64>(), ",unique,unique").contains("duplicate option unique"));
        assert!(
            error(&scalar::<i64>(), ",auto_increment,version")
                .contains("option auto_increment conflict with option version")
        );
        assert!(
            error(&scalar::<String>(), ",json,gob").contains("option json conflict with option gob")
        );
        assert!(error(&scalar::<String>(), ",size").contains("unsupported option: size"));
        assert!(error(&scalar::<String>(), ",size=0").contains("invalid option size=0"));
        assert!(error(&scalar::<String>(), ",size=x").contains("invalid option size=x"));
        assert!(error(&scalar::<String>(), ",unique=1").contains("unsupported option: unique=1"));
    }

    #[test]
    fn type_mismatches() {
        assert!(error(&scalar::<String>(), ",auto_increment").contains("type mismatch option auto_increment"));
        assert!(error(&scalar::<bool>(), ",version").contains("type mismatch option version"));
        assert!(error(&scalar::<i16>(), ",auto_now").contains("type mismatch option auto_now"));
        assert!(error(&scalar::<i64>(), ",size=5").contains("type mismatch option size"));
        assert!(error(&scalar::<i64>(), ",inline").contains("type mismatch option inline"));
        assert!(error(&scalar::<i64>(), ",foreign_key").contains("type mismatch option foreign_key"));
        assert!(error(&RECORD, ",one_to_many").contains("type mismatch option one_to_many"));
        assert!(error(&RECORDS, ",foreign_key").contains("type mismatch option foreign_key"));
    }

    #[test]
    fn exclusive_options() {
        assert!(error(&RECORD, ",inline,unique").contains("option inline conflict with others"));
        assert!(
            error(&RECORDS, "pets,one_to_many").contains("option one_to_many conflict with others")
        );
        assert!(
            error(&RECORDS, ",many_to_many,unique")
                .contains("option many_to_many conflict with others")
        );
    }

    #[test]
    fn option_sets() {
        let mut options = Options::empty();
        assert!(options.is_empty());
        options.insert(Options::VERSION);
        options |= Options::UNIQUE;
        assert!(options.contains(Options::VERSION));
        assert!(options.intersects(Options::UNIQUE | Options::GOB));
        assert!(!options.contains(Options::UNIQUE | Options::GOB));
        options.remove(Options::VERSION);
        assert_eq!(options, Options::UNIQUE);
        assert_eq!(format!("{:?}", Options::PRIMARY_KEY | Options::UNIQUE | Options::NULLABLE), r#"{"primary_key", "unique", "nullable"}"#);
        assert_eq!(Options::GOB.name(), "gob");
        assert_eq!(Options::NULLABLE.name(), "?");
    }

    #[test]
    fn normalized_values() {
        let FieldKind::Scalar {
            prototype,
            normalize,
            ..
        } = scalar::<i16>()
        else {
            unreachable!()
        };
        assert_eq!(prototype(), Value::Int16(None));
        assert_eq!(normalize(Value::Int64(Some(7))).unwrap(), Value::Int16(Some(7)));
        assert!(normalize(Value::Int64(Some(1 << 20))).is_err());
    }
}
