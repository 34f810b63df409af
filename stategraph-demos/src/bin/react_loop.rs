//! ReAct loop demo: a scripted model asks the `add` tool, then answers.

use std::sync::Arc;

use clap::Parser;
use serde_json::json;
use stategraph::message::read_messages;
use stategraph::{
    LlmResponse, MemorySaver, Message, MockLlm, RunOutcome, StateUpdate, ToolCall, MESSAGES_FIELD,
};
use stategraph_demos::{init_tracing, log_outcome, react_loop_graph, DemoConfig, Error};

#[derive(Parser, Debug)]
#[command(name = "react_loop")]
#[command(about = "Runs START -> llm -> (tool | END), tool -> llm with a scripted model")]
struct Args {
    /// First addend the scripted model passes to the tool.
    #[arg(long, default_value_t = 2)]
    a: i64,

    /// Second addend.
    #[arg(long, default_value_t = 1)]
    b: i64,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenv::dotenv().ok();
    init_tracing();
    let args = Args::parse();
    let config = DemoConfig::from_env()?;

    let llm = MockLlm::new([
        LlmResponse::tool_calls(vec![ToolCall::new(
            "call-1",
            "add",
            json!({"a": args.a, "b": args.b}),
        )]),
        LlmResponse::text(format!("{} + {} = {}", args.a, args.b, args.a + args.b)),
    ]);
    let graph = react_loop_graph(Arc::new(llm), Arc::new(MemorySaver::new()))?;

    let question = format!("What is {} + {}?", args.a, args.b);
    println!("User: {}", question);
    println!("---");
    let input = StateUpdate::new().set_serialized(MESSAGES_FIELD, &[Message::user(question)])?;
    let result = graph
        .start_with_config(input, config.runnable_config(None))
        .await?;
    log_outcome(&result.run_id, &result.outcome);

    let state = match result.outcome {
        RunOutcome::Completed(state) => state,
        RunOutcome::Suspended(interrupt) => {
            return Err(format!("unexpected interrupt from `{}`", interrupt.node_id).into())
        }
        RunOutcome::Failed(e) => return Err(e.into()),
    };
    for m in read_messages(&state, MESSAGES_FIELD)? {
        match m {
            Message::System { content } => println!("[System] {}", content),
            Message::User { content } => println!("[User] {}", content),
            Message::Assistant {
                content,
                tool_calls,
            } => {
                for call in &tool_calls {
                    println!("[Assistant] calls {}({})", call.name, call.arguments);
                }
                if !content.is_empty() {
                    println!("[Assistant] {}", content);
                }
            }
            Message::Tool { name, content, .. } => println!("[Tool {}] {}", name, content),
        }
    }
    Ok(())
}
