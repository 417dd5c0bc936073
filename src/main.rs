use lambda_runtime::{service_fn, Error, LambdaEvent};
use std::sync::Arc;
use titan_image_lambda::{
    logger, BedrockClient, Config, ImageClient, InboundRequest, OutboundResponse, RequestHandler,
};

async fn function_handler(
    handler: &RequestHandler<ImageClient>,
    event: LambdaEvent<InboundRequest>,
) -> Result<OutboundResponse, Error> {
    logger::set_request_id(Some(event.context.request_id.clone()));
    let result = handler.handle(event.payload).await;
    logger::set_request_id(None);

    Ok(result?)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let dotenv_loaded = dotenv::dotenv().is_ok();
    let config = Config::from_env();
    logger::init_with_config(config.logger.clone())?;

    if dotenv_loaded {
        log::debug!(".env file loaded");
    }

    log::info!(
        "Starting {} v{}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );
    for (id, name, provider) in ImageClient::supported_models() {
        log::debug!("Image model available: {} - {} ({})", id, name, provider);
    }

    let client = match BedrockClient::new(config.bedrock).await {
        Ok(client) => client,
        Err(e) => {
            log::error!("Failed to initialize Bedrock client: {}", e);
            return Err(e.into());
        }
    };
    log::info!("Using image model {}", client.image().model_id());

    let handler = Arc::new(RequestHandler::new(client.into_image_client()));

    lambda_runtime::run(service_fn(move |event: LambdaEvent<InboundRequest>| {
        let handler = Arc::clone(&handler);
        async move { function_handler(&handler, event).await }
    }))
    .await
}
