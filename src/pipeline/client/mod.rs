pub mod azure_face_client;
pub mod face_api_client;
#[cfg(test)]
pub mod stub_face_client;
