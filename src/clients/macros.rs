/// Generate client methods with oneshot channel boilerplate and automatic tracing.
///
/// Each generated method sends `$request::$variant` with the listed parameters
/// plus a `respond_to` channel, then waits for the actor's reply.
macro_rules! client_method {
    ($client:ty => fn $method:ident($($param:ident: $param_type:ty),*) -> $return_type:ty as $request:ident::$variant:ident) => {
        impl $client {
            #[tracing::instrument(skip(self))]
            pub async fn $method(&self, $($param: $param_type),*) -> Result<$return_type, $crate::error::CatalogError> {
                tracing::debug!("Sending request");
                let (respond_to, response) = tokio::sync::oneshot::channel();
                self.sender.send($request::$variant {
                    $($param,)*
                    respond_to,
                }).await.map_err(|_| $crate::error::CatalogError::ActorCommunication("Actor closed".to_string()))?;

                response.await.map_err(|_| $crate::error::CatalogError::ActorCommunication("Actor dropped".to_string()))?
            }
        }
    };
}
