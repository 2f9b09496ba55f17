use az_search::SearchClient;
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::from_filename("./az-search/.env.local").ok();
    let client = SearchClient::from_env();

    let names = client.list_index_names().await?;
    println!("{} indexes on {}", names.len(), client.endpoint());

    for name in &names {
        let count = client.count_documents(name).await?;
        println!("  {name}: {count} documents");
    }

    if let Some(name) = names.first() {
        if let Some(index) = client.get_index(name).await? {
            println!("schema of {}: {} fields", index.name, index.fields.len());
        }
    }

    for alias in client.list_aliases().await? {
        println!("alias {} -> {}", alias.name, alias.indexes.join(", "));
    }

    Ok(())
}
