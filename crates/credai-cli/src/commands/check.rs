//! AI backend connection test

use std::io::{self, Write};

use anyhow::{Context, Result};
use credai_core::{AIBackend, AIClient, BackendKind, CompletionRequest, Settings};

/// Show the resolved AI settings and test the backend connection
pub async fn cmd_check(settings: &Settings) -> Result<()> {
    println!("🔍 Testing AI backend connection...\n");

    let ai = &settings.ai;
    println!("  Backend: {}", ai.backend);
    println!("  Host:    {}", ai.host);
    println!("  Model:   {}", ai.model);
    match ai.masked_api_key() {
        Some(masked) => println!("  API key: {} (from {})", masked, ai.api_key_env),
        None if ai.backend == BackendKind::OpenaiCompatible => {
            println!("  ⚠️  API key not set (export {}=...)", ai.api_key_env)
        }
        None => println!("  API key: (not required)"),
    }
    println!();

    let client = AIClient::from_settings(ai).context("Failed to configure AI backend")?;

    print!("Checking availability... ");
    io::stdout().flush()?;

    if !client.health_check().await {
        println!("❌ Failed");
        println!("\n⚠️  Could not reach {} at {}", client.provider(), client.host());
        if ai.backend == BackendKind::Ollama {
            println!("\nTo set up Ollama:");
            println!("  1. Install Ollama: https://ollama.ai/download");
            println!("  2. Start the server: ollama serve");
            println!("  3. Pull the model: ollama pull {}", ai.model);
        }
        return Ok(());
    }
    println!("✅ Connected");

    print!("Sending test prompt... ");
    io::stdout().flush()?;
    match send_test_prompt(&client).await {
        Ok(reply) if reply.is_empty() => println!("❌ Empty reply"),
        Ok(reply) => println!("✅ {}", reply_preview(&reply)),
        Err(e) => println!("❌ {}", e),
    }

    Ok(())
}

/// Send a short completion and return the trimmed reply
pub async fn send_test_prompt<B: AIBackend>(backend: &B) -> credai_core::Result<String> {
    let request = CompletionRequest {
        max_tokens: 20,
        ..CompletionRequest::user("Reply with the single word OK.")
    };

    let reply = backend.complete(&request).await?;
    Ok(reply.trim().to_string())
}

fn reply_preview(reply: &str) -> String {
    super::truncate(reply.lines().next().unwrap_or_default(), 60)
}
