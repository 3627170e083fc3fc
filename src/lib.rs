//! The AWS/Lambda-powered image analysis services.
//!
//! Three APIs share this library: `upload` takes an image (multipart form
//! data or a remote URL), stores it in S3, and describes it with
//! Rekognition; `history` lists every stored analysis record from DynamoDB;
//! `analyze` runs detection against an already-stored object and persists
//! the result. Each is deployed as its own Lambda function, but all three
//! are compiled into one executable; we know which function is being invoked
//! by looking at the suffix of the function ARN.
//!
//! The handlers are HTTP-shaped (methods, headers, CORS), so the deployment
//! binary speaks API Gateway's "proxy event" protocol. The oneshot binary
//! drives a single handler from the command line for local testing.

use lambda_http::{Body, Request, Response};
use lambda_runtime::Error;

use aws_config::{BehaviorVersion, Region};

mod analyze;
mod config;
mod detect;
mod error;
mod history;
mod ingest;
mod model;
mod response;
mod upload;

pub use config::Config;

pub struct Services {
    config: Config,
    s3: aws_sdk_s3::Client,
    dc: aws_sdk_dynamodb::Client,
    rek: aws_sdk_rekognition::Client,
    http: reqwest::Client,
}

impl Services {
    /// Create the long-lived state for the image analysis Lambdas.
    ///
    /// Client construction is expensive, so it happens once per process;
    /// every invocation borrows these handles. They are all safe to share
    /// across concurrent invocations.
    pub async fn init() -> Result<Self, Error> {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_target(false) // don't print the module name
            .without_time() // don't print time (CloudWatch has it)
            .init();

        let config = Config::from_env()?;

        let regional = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .load()
            .await;

        // Rekognition gets its own config: the analysis service is pinned to
        // one region and does not follow the AWS_REGION override.
        let analysis = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config::ANALYSIS_REGION))
            .load()
            .await;

        Ok(Services {
            s3: aws_sdk_s3::Client::new(&regional),
            dc: aws_sdk_dynamodb::Client::new(&regional),
            rek: aws_sdk_rekognition::Client::new(&analysis),
            http: reqwest::Client::new(),
            config,
        })
    }

    /// Handle an invocation of one of the image analysis APIs.
    ///
    /// The suffix of the invoked function ARN picks the handler. Each Lambda
    /// server process only ever serves one function, but checking per
    /// invocation is cheap and keeps the three deployments on one codebase.
    pub async fn dispatch(&self, mut arn: String, req: Request) -> Result<Response<Body>, Error> {
        // Local testing environment?
        if arn.ends_with(":test_function") {
            arn = std::env::var("IMAGE_ANALYSIS_LOCALTEST_ARN")?;
        }

        if arn.ends_with("upload") {
            upload::handler(req, &self.s3, &self.rek, &self.http, &self.config.bucket).await
        } else if arn.ends_with("history") {
            history::handler(&self.dc, &self.config.table).await
        } else if arn.ends_with("analyze") {
            analyze::handler(
                req,
                &self.rek,
                &self.dc,
                &self.config.bucket,
                &self.config.table,
            )
            .await
        } else {
            Err(format!("unhandled function: {}", arn).into())
        }
    }
}

#[cfg(test)]
mod test_support {
    //! Clients backed by a bare SdkConfig: constructing them is free and
    //! offline, and any request they send fails fast for lack of
    //! credentials. Good enough for exercising the paths that must not
    //! reach AWS at all.

    use aws_config::{BehaviorVersion, Region, SdkConfig};

    fn dummy_config() -> SdkConfig {
        SdkConfig::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("eu-west-1"))
            .build()
    }

    pub fn dummy_s3() -> aws_sdk_s3::Client {
        aws_sdk_s3::Client::new(&dummy_config())
    }

    pub fn dummy_dynamodb() -> aws_sdk_dynamodb::Client {
        aws_sdk_dynamodb::Client::new(&dummy_config())
    }

    pub fn dummy_rekognition() -> aws_sdk_rekognition::Client {
        aws_sdk_rekognition::Client::new(&dummy_config())
    }
}
