use std::error::Error;
use std::time::Duration;

use searchbridge::{
    ChangeEvent, ContentSource, IncludedPath, IndexConfiguration, IndexDefinition,
    MockSearchBackend, PageChange, SearchBridge, StrategyRegistry,
};
use tokio::time::sleep;
use uuid::Uuid;

fn make_page(language: &str, name: &str, tree_path: &str) -> PageChange {
    PageChange {
        item_guid: Uuid::new_v4(),
        item_id: 1,
        language: language.to_string(),
        content_type: "article".to_string(),
        name: name.to_string(),
        is_secured: false,
        channel: "website".to_string(),
        tree_path: tree_path.to_string(),
        order: 0,
    }
}

struct CmsSnapshot {
    pages: Vec<PageChange>,
}

#[async_trait::async_trait]
impl ContentSource for CmsSnapshot {
    async fn scoped_content(
        &self,
        definition: &IndexDefinition,
    ) -> searchbridge::domain::Result<Vec<ChangeEvent>> {
        Ok(self
            .pages
            .iter()
            .filter(|p| definition.covers_page(p))
            .cloned()
            .map(ChangeEvent::Page)
            .collect())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let backend = MockSearchBackend::new();
    let bridge = SearchBridge::new(backend.clone(), StrategyRegistry::new());
    bridge.register_indexes(vec![IndexConfiguration::new(1, "news", "website")
        .with_languages(&["en", "sv"])
        .with_path(IncludedPath::new("/news/%", vec![]))])?;
    bridge.start();

    let article_en = make_page("en", "Launch day", "/news/launch");
    let article_sv = make_page("sv", "Lanseringsdag", "/news/lansering");
    let shop_page = make_page("en", "Checkout", "/shop/checkout");

    bridge.handler().page_published(&article_en).await;
    bridge.handler().page_published(&article_sv).await;
    bridge.handler().page_published(&shop_page).await;
    bridge.flush().await;
    sleep(Duration::from_millis(100)).await;
    println!("after publish: {} documents", backend.documents_in("news").len());

    bridge.handler().page_deleted(&article_sv).await;
    bridge.flush().await;
    sleep(Duration::from_millis(100)).await;
    println!("after delete:  {} documents", backend.documents_in("news").len());

    let snapshot = CmsSnapshot {
        pages: vec![article_en, article_sv, shop_page],
    };
    let queued = bridge.rebuilder(snapshot).rebuild("news").await?;
    println!("rebuild queued {} items", queued);

    bridge.shutdown().await;

    for (i, doc) in backend.documents_in("news").iter().enumerate() {
        println!("{}: {} ({})", i, doc.name, doc.object_id);
    }

    Ok(())
}
