//! "Proxy event" version of the image analysis Lambda implementations.
//!
//! This executable defines a server that expects to be interacted with
//! according to AWS API Gateway's "proxy event" protocol, which is how the
//! cloud deployment reaches us. Methods, headers, and transport base64
//! decoding are all handled by `lambda_http` before the request lands in
//! our dispatch.

use lambda_http::{run, service_fn, Error, Request, RequestExt};

use image_analysis_lambda::Services;

#[tokio::main]
async fn main() -> Result<(), Error> {
    let svcs = Services::init().await?;
    let ref_svcs = &svcs;

    run(service_fn(|req: Request| async move {
        let context = req.lambda_context();
        ref_svcs.dispatch(context.invoked_function_arn, req).await
    }))
    .await?;
    Ok(())
}
