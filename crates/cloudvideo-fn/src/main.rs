use std::sync::Arc;

use lambda_runtime::{service_fn, Error, LambdaEvent};

use cloudvideo_core::Config;
use cloudvideo_fn::pipeline::{Pipeline, RenderRequest};
use cloudvideo_fn::telemetry;

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenvy::dotenv().ok();
    telemetry::init_telemetry();

    let config = Config::from_env()?;
    let storage = cloudvideo_storage::create_storage(&config).await?;
    let pipeline = Arc::new(Pipeline::new(&config, storage));

    tracing::debug!(
        environment = ?config.environment,
        ffmpeg_version = %pipeline.ffmpeg_version().await,
        scratch_root = %config.scratch_root.display(),
        "Starting transcode function"
    );

    lambda_runtime::run(service_fn(move |event: LambdaEvent<RenderRequest>| {
        let pipeline = pipeline.clone();
        async move {
            pipeline
                .run(event.payload)
                .await
                .map_err(|e| {
                    tracing::error!(error = %e, stage = e.stage(), "Pipeline failed");
                    Error::from(e)
                })
        }
    }))
    .await
}
