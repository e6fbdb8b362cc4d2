use std::sync::Arc;

use jive_core::Namespace;
use jive_memory::MemoryRepository;
use jive_server::{ServerBuilder, ServerConfig, ToolDispatcher};
use jive_store::{Embedder, HashEmbedder, LanceStore, StoreAdapter};
use jive_workitem::{ProgressEngine, WorkItemRepository};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = tracing_subscriber::fmt::try_init();

    let config = ServerConfig::from_env();
    let default_namespace = Namespace::parse(&config.default_namespace)
        .unwrap_or_else(|_| Namespace::default_namespace());

    let store: Arc<dyn StoreAdapter> = Arc::new(LanceStore::new(config.data_dir.clone()));
    let embedder: Arc<dyn Embedder> = Arc::new(HashEmbedder::new(config.embed_dim));

    let work_items = Arc::new(WorkItemRepository::new(
        Arc::clone(&store),
        Arc::clone(&embedder),
        jive_workitem::WorkItemConfig::default(),
    ));
    let progress = Arc::new(ProgressEngine::new(Arc::clone(&store), Arc::clone(&work_items)));
    let memory = Arc::new(MemoryRepository::new(
        Arc::clone(&store),
        Arc::clone(&embedder),
        jive_memory::MemoryConfig::default(),
    ));

    let dispatcher = Arc::new(ToolDispatcher::new(work_items, progress, memory, default_namespace));

    let server = ServerBuilder::new()
        .name(config.name.clone())
        .version(config.version.clone())
        .jive_tools(dispatcher)?
        .build();

    // The CLI wrapper that drives this process is out of scope; it invokes us with
    // `JIVE_TRANSPORT` set to the transport it wants (defaults to stdio).
    match std::env::var("JIVE_TRANSPORT").unwrap_or_else(|_| "stdio".to_string()).as_str() {
        #[cfg(feature = "http")]
        "http" => server.run_http((config.bind_address.as_str(), config.port)).await?,
        #[cfg(feature = "websocket")]
        "websocket" | "ws" => server.run_websocket((config.bind_address.as_str(), config.port)).await?,
        _ => server.run_stdio().await?,
    }

    Ok(())
}
