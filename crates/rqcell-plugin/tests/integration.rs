//! Integration tests for rqcell-plugin

use rqcell_config::TransformSettings;
use rqcell_plugin::RqCellPlugin;

const CELL: &str = r#"export const RQUERY = gql`
  query FindUsers {
    users { id }
  }
`

export const Empty = () => <p>No users</p>
export const Success = ({ users }) => <ul>{users.length}</ul>
"#;

#[test]
fn wraps_cells() {
    let plugin = RqCellPlugin::new();
    let code = plugin
        .transform_module("/app/web/src/components/UsersCell/UsersCell.jsx", CELL)
        .unwrap()
        .expect("cell should be rewritten");

    assert!(code.starts_with("import { withRQCell } from '@rwjsexperiments/react';"));
    assert!(code.contains("export default withRQCell({"));
    assert!(code.contains("QUERY: RQUERY"));
}

#[test]
fn passes_through_plain_modules() {
    let plugin = RqCellPlugin::new();
    let result = plugin
        .transform_module("/app/web/src/App.jsx", "export const App = () => null;\n")
        .unwrap();
    assert!(result.is_none());
}

#[test]
fn skips_excluded_and_foreign_modules() {
    let plugin = RqCellPlugin::new();
    assert!(
        plugin
            .transform_module("/app/node_modules/lib/UsersCell.js", CELL)
            .unwrap()
            .is_none()
    );
    assert!(
        plugin
            .transform_module("/app/web/src/index.css", "body {}")
            .unwrap()
            .is_none()
    );
}

#[test]
fn parse_errors_are_reported() {
    let plugin = RqCellPlugin::new();
    let err = plugin
        .transform_module("/app/Broken.js", "export const = ;")
        .unwrap_err();
    assert!(err.to_string().contains("/app/Broken.js"));
}

#[test]
fn settings_drive_the_rewrite() {
    let settings = TransformSettings {
        import_source: "@acme/cells".to_string(),
        wrapper: "withCell".to_string(),
        extensions: vec!["jsx".to_string()],
        ..TransformSettings::default()
    };
    let plugin = RqCellPlugin::from_settings(&settings);

    let code = plugin
        .transform_module("UsersCell.jsx", CELL)
        .unwrap()
        .unwrap();
    assert!(code.starts_with("import { withCell } from '@acme/cells';"));

    // .js is no longer in the extension list
    assert!(plugin.transform_module("UsersCell.js", CELL).unwrap().is_none());
}

#[test]
fn repeated_calls_are_independent() {
    let plugin = RqCellPlugin::new();
    assert!(plugin.transform_module("A.jsx", CELL).unwrap().is_some());
    assert!(
        plugin
            .transform_module("B.jsx", "export const Success = () => null;\n")
            .unwrap()
            .is_none()
    );
}
