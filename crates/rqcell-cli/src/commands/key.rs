//! Key command implementation

use rqcell_runtime::{QueryKey, Variables, build_query_key};

use crate::cli::KeyArgs;
use crate::commands::utils;
use crate::error::Result;

/// Print the cache key a Cell would use for the document and variables
pub async fn execute(args: KeyArgs) -> Result<()> {
    let key = compute(&args)?;
    println!("{key}");
    Ok(())
}

pub fn compute(args: &KeyArgs) -> Result<QueryKey> {
    let document = utils::read_document(&args.document)?;
    let variables = args.variables.clone().unwrap_or_else(Variables::new);
    Ok(build_query_key(&document, &variables))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_compute_key_sorts_variables() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("post.graphql");
        std::fs::write(&path, "query FindPost($id: Int!) { post(id: $id) { id } }").unwrap();

        let mut variables = Variables::new();
        variables.insert("z".into(), json!(1));
        variables.insert("id".into(), json!(7));
        let key = compute(&KeyArgs {
            document: path,
            variables: Some(variables),
        })
        .unwrap();
        assert_eq!(key.to_string(), r#"["FindPost",{"id":7,"z":1}]"#);
    }
}
