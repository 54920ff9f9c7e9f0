use test_discovery_core::model::{
    ContainerModel, ElementRegistry, MethodModel, Visibility, TEST_MARKER,
};

/// Registry shared by the integration tests: two flat containers with an
/// overlapping method name, a nested hierarchy, an abstract base and a
/// container without tests.
pub fn sample_registry() -> ElementRegistry {
    let mut registry = ElementRegistry::new();
    registry.add_container(
        ContainerModel::new("com.example.CalculatorTests")
            .with_method(
                MethodModel::new("add")
                    .with_marker(TEST_MARKER)
                    .with_marker("tag:fast"),
            )
            .with_method(
                MethodModel::new("subtract")
                    .with_marker(TEST_MARKER)
                    .with_marker("tag:slow"),
            )
            .with_method(MethodModel::new("helper").with_visibility(Visibility::Private)),
    );
    registry.add_container(
        ContainerModel::new("com.example.StringTests")
            .with_method(MethodModel::new("trim").with_marker(TEST_MARKER))
            .with_method(MethodModel::new("add").with_marker(TEST_MARKER)),
    );
    registry.add_container(
        ContainerModel::new("com.example.OuterTests")
            .with_method(MethodModel::new("top").with_marker(TEST_MARKER))
            .with_nested("com.example.OuterTests$InnerTests"),
    );
    registry.add_container(
        ContainerModel::new("com.example.OuterTests$InnerTests")
            .with_enclosing("com.example.OuterTests")
            .with_method(MethodModel::new("inner").with_marker(TEST_MARKER))
            .with_method(MethodModel::new("deep").with_marker(TEST_MARKER)),
    );
    registry.add_container(ContainerModel::new("com.example.AbstractBase").abstract_container());
    registry.add_container(
        ContainerModel::new("com.example.PlainHolder").with_method(MethodModel::new("noop")),
    );
    registry
}
