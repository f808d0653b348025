//! Example: The PromptCraft 2.0 deployment architecture
//!
//! Declares a frontend, a two-server local LLM tier behind a load balancer
//! and an integration layer, then renders the result with Graphviz.
//!
//! ```text
//! cargo run --example promptcraft -- promptcraft_real_architecture.png
//! ```
//!
//! Use a `.dot` output path to get the DOT source without a Graphviz install.

use std::env;

use log::{LevelFilter, info};

use archdraw::{
    ArchdrawError, DiagramContext,
    config::load_config,
    render::graphviz::GraphvizBackend,
    semantic::{Direction, ElementKind},
    style::{Attributes, GraphStyle},
};

fn main() -> Result<(), ArchdrawError> {
    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(LevelFilter::Info)
        .init();

    let output = env::args()
        .nth(1)
        .unwrap_or_else(|| "promptcraft_real_architecture.png".to_string());

    let config = load_config(None::<&str>)?;
    let backend = GraphvizBackend::new(&config);

    let mut ctx = DiagramContext::open(
        "PromptCraft 2.0 - Actual Architecture",
        Direction::TopToBottom,
        GraphStyle::default(),
    )?;

    let user = ctx.create_element(
        ElementKind::Person,
        "User",
        "Prompt Engineer\nData Analyst",
        Attributes::new(),
    );

    let (browser, nextjs_app, api_routes, engine) = {
        let mut frontend =
            ctx.push_boundary("Frontend - Windows (localhost:3000)", Attributes::new());
        (
            frontend.create_element(
                ElementKind::Container,
                "Browser\nChrome/Edge",
                "Modern UI with Glass Morphism",
                Attributes::new(),
            ),
            frontend.create_element(
                ElementKind::Container,
                "Next.js App\nReact + TypeScript",
                "PromptCraftGenerator Component\nDomain Intelligence\nTailwind CSS",
                Attributes::new(),
            ),
            frontend.create_element(
                ElementKind::Container,
                "API Routes\nNext.js API",
                "/api/llm/execute\n/api/integrations/neo4j\n/api/integrations/status",
                Attributes::new(),
            ),
            frontend.create_element(
                ElementKind::Container,
                "PromptCraft Engine\nTypeScript Core",
                "Domain Templates\nVariable Injection\nJSON Generation\nModel Selection Logic",
                Attributes::new(),
            ),
        )
    };

    let (sqlcoder, neo4j, deepseek, mistral, loadbalancer) = {
        let mut llm = ctx.push_boundary("Local LLM Servers", Attributes::new());

        let (sqlcoder, neo4j) = {
            let mut server = llm.push_boundary("Server 1 (10.100.15.67)", Attributes::new());
            (
                server.create_element(
                    ElementKind::Server,
                    "SQLCoder 7B",
                    "Port: 1138\nBanking + SQL Analysis\nThreads: 8, Context: 2048",
                    Attributes::new(),
                ),
                server.create_element(
                    ElementKind::Database,
                    "Neo4j Database",
                    "Port: 7687\nPrompt Storage\nRelationships\nAnalytics",
                    Attributes::new(),
                ),
            )
        };

        let (deepseek, mistral) = {
            let mut server = llm.push_boundary("Server 2 (10.100.15.66)", Attributes::new());
            (
                server.create_element(
                    ElementKind::Server,
                    "DeepSeek Coder 1.3B",
                    "Port: 1138\nCode Generation\nTechnical Prompts",
                    Attributes::new(),
                ),
                server.create_element(
                    ElementKind::Server,
                    "Mistral 7B",
                    "Port: 1137\nHealthcare Analysis\nReasoning Tasks",
                    Attributes::new(),
                ),
            )
        };

        let loadbalancer = llm.create_element(
            ElementKind::NetworkGateway,
            "LLM Load Balancer",
            "llm-loadbalancer.local\nMulti-Model Routing\nHigh Availability",
            Attributes::new(),
        );

        (sqlcoder, neo4j, deepseek, mistral, loadbalancer)
    };

    let (rag_engine, dq_pipeline, file_storage) =
        ctx.with_boundary("Integration Layer", Attributes::new(), |ctx| {
            Ok::<_, ArchdrawError>((
                ctx.create_element(
                    ElementKind::Container,
                    "RAG Engine",
                    "localhost:8000\nVector Database\nKnowledge Retrieval",
                    Attributes::new(),
                ),
                ctx.create_element(
                    ElementKind::Container,
                    "7D-DQ Pipeline",
                    "Python + Neo4j\nData Quality Integration\nExisting Pipeline",
                    Attributes::new(),
                ),
                ctx.create_element(
                    ElementKind::Storage,
                    "Local Storage",
                    "JSON Configs\nPrompt Templates\nExport Files",
                    Attributes::new(),
                ),
            ))
        })?;

    ctx.chain(user)
        .to(browser, "Accesses", Attributes::new())?
        .to(nextjs_app, "HTTP Requests", Attributes::new())?
        .to(browser, "Component Rendering", Attributes::new())?;

    ctx.chain(nextjs_app)
        .to(api_routes, "API Calls", Attributes::new())?
        .to(engine, "Business Logic", Attributes::new())?;

    let flows = [
        (engine, sqlcoder, "Banking + SQL Tasks"),
        (engine, deepseek, "Code Generation"),
        (engine, mistral, "Healthcare Analysis"),
        (engine, loadbalancer, "Load Balanced Requests"),
        (loadbalancer, sqlcoder, "Routes to"),
        (loadbalancer, deepseek, "Routes to"),
        (loadbalancer, mistral, "Routes to"),
        (engine, neo4j, "Stores Prompts"),
        (engine, file_storage, "Exports JSON"),
        (engine, rag_engine, "Context Enhancement"),
        (neo4j, dq_pipeline, "DQ Data Source"),
        (dq_pipeline, neo4j, "Feeds Data"),
        (sqlcoder, engine, "LLM Response"),
        (deepseek, engine, "LLM Response"),
        (mistral, engine, "LLM Response"),
        (engine, api_routes, "JSON Response"),
        (api_routes, nextjs_app, "HTTP Response"),
    ];
    for (source, target, label) in flows {
        ctx.connect(source, target, label, Attributes::new())?;
    }

    let diagram = ctx.close(&backend, &output)?;
    info!(
        output,
        elements = diagram.elements().len(),
        boundaries = diagram.boundaries().len(),
        relationships = diagram.relationships().len();
        "PromptCraft architecture rendered"
    );

    Ok(())
}
