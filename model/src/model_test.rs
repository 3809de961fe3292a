use super::*;
use crate::test_utils::init_test_logging;
use pretty_assertions::assert_eq;

/// A small tree: expressions, functions with optional statement bodies and
/// a `Declaration` enum that inherits the variants of `ClassElement`.
fn fixture() -> Catalogue {
    let mut catalogue = Catalogue::new();
    catalogue.terminal("Span").statements("Stmt");

    let types: Vec<NodeDecl> = vec![
        NodeType::structure("Binary")
            .lifetime()
            .field("span", "Span")
            .field("left", "Expr<'a>")
            .field("right", "Expr<'a>")
            .into(),
        NodeType::structure("Leaf")
            .field("span", "Span")
            .field("value", "f64")
            .into(),
        NodeType::enumeration("Expr")
            .lifetime()
            .variant("Binary", "Box<'a, Binary<'a>>")
            .variant("Leaf", "Box<'a, Leaf>")
            .variant("Number", "f64")
            .into(),
        NodeType::structure("Func")
            .lifetime()
            .field("span", "Span")
            .field("params", "Vec<'a, Expr<'a>>")
            .field("body", "Option<Vec<'a, Stmt<'a>>>")
            .into(),
        NodeType::enumeration("Stmt")
            .lifetime()
            .variant("Expression", "Box<'a, Expr<'a>>")
            .variant("Decl", "Declaration<'a>")
            .inherits("Declaration")
            .into(),
        NodeType::enumeration("Declaration")
            .lifetime()
            .variant("Func", "Box<'a, Func<'a>>")
            .variant("ClassElement", "ClassElement<'a>")
            .inherits("ClassElement")
            .into(),
        NodeType::enumeration("ClassElement")
            .lifetime()
            .variant("Method", "Box<'a, Method<'a>>")
            .variant("Property", "Box<'a, Property<'a>>")
            .into(),
        NodeType::structure("Method")
            .lifetime()
            .field("key", "Expr<'a>")
            .field("value", "Box<'a, Func<'a>>")
            .into(),
        NodeType::structure("Property")
            .lifetime()
            .field("key", "Expr<'a>")
            .field("value", "Option<Expr<'a>>")
            .into(),
    ];
    for ty in types {
        catalogue.insert(ty).unwrap();
    }
    catalogue
}

/// Every field is 8 bytes wide, laid out in declaration order.
fn build(catalogue: Catalogue) -> Result<Model, ModelError> {
    let reference = catalogue.clone();
    let layout = move |ty: &str, field: &str| {
        reference
            .node(ty)?
            .as_struct()?
            .fields()
            .iter()
            .position(|f| f.name() == field)
            .map(|i| i * 8)
    };
    Model::build(catalogue, &layout)
}

#[test]
fn test_tags_are_sequential_in_catalogue_order() {
    init_test_logging();
    let model = build(fixture()).unwrap();
    let ancestors = model.ancestors();

    let names: Vec<(u32, &str, &str)> = ancestors
        .tags()
        .iter()
        .map(|tag| (tag.id().get(), tag.name(), tag.accessor()))
        .collect();
    assert_eq!(
        names,
        vec![
            (1, "BinaryLeft", "BinaryWithoutLeft"),
            (2, "BinaryRight", "BinaryWithoutRight"),
            (3, "FuncParams", "FuncWithoutParams"),
            (4, "FuncBody", "FuncWithoutBody"),
            (5, "MethodKey", "MethodWithoutKey"),
            (6, "MethodValue", "MethodWithoutValue"),
            (7, "PropertyKey", "PropertyWithoutKey"),
            (8, "PropertyValue", "PropertyWithoutValue"),
        ]
    );
    assert_eq!(ancestors.tag_count(), 9);
    assert_eq!(ancestors.repr(), DiscriminantRepr::U8);
    assert_eq!(model.tag("Binary", "span"), None);
    assert_eq!(model.tag("Leaf", "value"), None);
}

#[test]
fn test_push_count_is_one_per_struct_with_descendable_fields() {
    let model = build(fixture()).unwrap();
    for plan in model.dispatch().plans() {
        let ty = model.catalogue().get(plan.ty());
        let descendable = ty
            .as_struct()
            .unwrap()
            .fields()
            .iter()
            .any(|field| model.catalogue().id(field.element()).is_some());
        assert_eq!(plan.pushes(), usize::from(descendable), "{}", ty.name());
        assert_eq!(plan.pops(), plan.pushes());
    }
    assert_eq!(model.dispatch().plan("Leaf").unwrap().pushes(), 0);
    assert_eq!(model.dispatch().plan("Binary").unwrap().retags(), 1);
}

#[test]
fn test_binary_plan_pushes_then_retags() {
    let model = build(fixture()).unwrap();
    let plan = model.dispatch().plan("Binary").unwrap();
    assert_eq!(
        plan.to_string(),
        "enter Binary\n  push BinaryLeft -> left\n  retag BinaryRight -> right\n  pop\nexit Binary"
    );
    assert_eq!(
        model.dispatch().plan("Leaf").unwrap().to_string(),
        "enter Leaf\nexit Leaf"
    );
}

#[test]
fn test_optional_statement_body_is_conditional() {
    let model = build(fixture()).unwrap();
    let plan = model.dispatch().plan("Func").unwrap();
    let steps = plan.steps();

    assert_eq!(steps[0].field(), "params");
    assert_eq!(steps[0].action(), StackAction::Push);
    assert_eq!(steps[0].flags(), StepFlags::SEQUENCE);

    assert_eq!(steps[1].field(), "body");
    assert_eq!(steps[1].action(), StackAction::Retag);
    assert_eq!(steps[1].shape(), FieldShape::OptionalSequence);
    assert_eq!(
        steps[1].flags(),
        StepFlags::OPTIONAL | StepFlags::SEQUENCE | StepFlags::STATEMENTS
    );
    assert_eq!(
        plan.to_string(),
        "enter Func\n  push FuncParams -> params\n  if present retag FuncBody -> body [statements]\n  pop\nexit Func"
    );

    let value = &model.dispatch().plan("Method").unwrap().steps()[1];
    assert_eq!(value.flags(), StepFlags::BOXED);
}

#[test]
fn test_inherited_variant_routes_to_base() {
    let model = build(fixture()).unwrap();
    let catalogue = model.catalogue();
    let id = |name: &str| catalogue.id(name).unwrap();
    let dispatch = model.dispatch();

    // Declaration inherits ClassElement: a Method is walked by ClassElement.
    assert_eq!(
        dispatch.route("Declaration", "Method"),
        Ok(Route::Inherited {
            via: id("ClassElement"),
            owner: id("ClassElement"),
        })
    );
    // Stmt reaches Method transitively, through its direct base Declaration.
    assert_eq!(
        dispatch.route("Stmt", "Method"),
        Ok(Route::Inherited {
            via: id("Declaration"),
            owner: id("ClassElement"),
        })
    );
    assert_eq!(
        dispatch.route("Stmt", "Decl"),
        Ok(Route::Own {
            payload: id("Declaration"),
            boxed: false,
        })
    );
    assert_eq!(
        dispatch.route("Declaration", "Func"),
        Ok(Route::Own {
            payload: id("Func"),
            boxed: true,
        })
    );
    assert_eq!(dispatch.route("Expr", "Number"), Ok(Route::Terminal));

    let routes: Vec<&str> = dispatch
        .dispatch("Stmt")
        .unwrap()
        .routes()
        .map(|(name, _)| name)
        .collect();
    assert_eq!(
        routes,
        vec!["Expression", "Decl", "Func", "ClassElement", "Method", "Property"]
    );
}

#[test]
fn test_listed_variant_is_routed_as_own() {
    let mut catalogue = fixture();
    catalogue
        .insert(
            NodeType::enumeration("Member")
                .lifetime()
                .variant("Func", "Box<'a, Func<'a>>")
                .inherits("Declaration"),
        )
        .unwrap();
    let model = build(catalogue).unwrap();
    let id = |name: &str| model.catalogue().id(name).unwrap();
    let dispatch = model.dispatch();

    assert_eq!(
        dispatch.route("Member", "Func"),
        Ok(Route::Own {
            payload: id("Func"),
            boxed: true,
        })
    );
    assert_eq!(
        dispatch.route("Member", "Method"),
        Ok(Route::Inherited {
            via: id("Declaration"),
            owner: id("ClassElement"),
        })
    );
    let routes: Vec<&str> = dispatch
        .dispatch("Member")
        .unwrap()
        .routes()
        .map(|(name, _)| name)
        .collect();
    assert_eq!(routes, vec!["Func", "ClassElement", "Method", "Property"]);
}

#[test]
fn test_unknown_variant_is_a_dispatch_error() {
    let model = build(fixture()).unwrap();
    let dispatch = model.dispatch();
    assert_eq!(
        dispatch.route("ClassElement", "Func"),
        Err(DispatchError::UnknownVariant {
            ty: "ClassElement".to_owned(),
            variant: "Func".to_owned()
        })
    );
    assert_eq!(
        dispatch.route("Binary", "Left"),
        Err(DispatchError::UnknownEnum {
            name: "Binary".to_owned()
        })
    );
    assert_eq!(
        dispatch.plan_for("Expr").unwrap_err(),
        DispatchError::UnknownStruct {
            name: "Expr".to_owned()
        }
    );
}

#[test]
fn test_predicates() {
    let model = build(fixture()).unwrap();
    let body = model.tag("Func", "body").unwrap();
    assert!(model.is_struct(body, "Func"));
    assert!(!model.is_struct(body, "Binary"));
    assert!(model.is_via(body, "Stmt"));
    assert!(model.is_via(body, "Declaration"));
    assert!(model.is_via(body, "ClassElement"));
    assert!(!model.is_via(body, "Expr"));

    let left = model.tag("Binary", "left").unwrap();
    assert!(model.is_via(left, "Expr"));
    assert!(!model.is_via(left, "Stmt"));
    assert!(!model.is_via(TagId::NONE, "Expr"));
    assert!(!model.is_struct(TagId::NONE, "Binary"));
}

#[test]
fn test_sibling_offsets() {
    let model = build(fixture()).unwrap();
    let left = model.tag("Binary", "left").unwrap();
    assert_eq!(model.sibling_offset(left, "span"), Some(0));
    assert_eq!(model.sibling_offset(left, "right"), Some(16));
    assert_eq!(model.sibling_offset(left, "left"), None);

    // Leaf owns no tag, so it has no row.
    assert_eq!(model.offsets().fields("Leaf"), None);
    assert_eq!(model.offsets().len(), 4);
}

#[test]
fn test_offset_table_survives_postcard() {
    let model = build(fixture()).unwrap();
    let bytes = model.offsets().to_bytes().unwrap();
    let table = FieldOffsetTable::from_bytes(&bytes).unwrap();
    assert_eq!(&table, model.offsets());

    // A persisted table is itself a layout provider.
    let rebuilt = Model::build(fixture(), &table).unwrap();
    assert_eq!(rebuilt.offsets(), model.offsets());
}

#[test]
fn test_missing_offset_is_fatal() {
    let layout = |ty: &str, field: &str| match (ty, field) {
        ("Binary", "right") => None,
        _ => Some(0),
    };
    assert_eq!(
        Model::build(fixture(), &layout).unwrap_err(),
        ModelError::MissingOffset {
            ty: "Binary".to_owned(),
            field: "right".to_owned()
        }
    );
}

#[test]
fn test_unknown_field_type_is_fatal() {
    let mut catalogue = fixture();
    catalogue
        .insert(NodeType::structure("Broken").field("child", "Option<Mystery>"))
        .unwrap();
    assert_eq!(
        build(catalogue).unwrap_err(),
        ModelError::UnknownType {
            owner: "Broken".to_owned(),
            member: "child".to_owned(),
            name: "Mystery".to_owned()
        }
    );
}

#[test]
fn test_wide_tag_space_uses_u16() {
    let mut catalogue = Catalogue::new();
    catalogue
        .insert(NodeType::enumeration("Node").variant("Unit", "u8"))
        .unwrap();
    for i in 0..300 {
        catalogue
            .insert(NodeType::structure(&format!("Holder{i}")).field("node", "Node"))
            .unwrap();
    }
    let model = build(catalogue).unwrap();
    assert_eq!(model.ancestors().tag_count(), 301);
    assert_eq!(model.ancestors().repr(), DiscriminantRepr::U16);
}
