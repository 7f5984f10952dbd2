//! Property-based serialization round-trip tests for the store protocol.
//!
//! Uses proptest to verify:
//! 1. Any valid `StoreRequest` survives an encode → decode round-trip.
//! 2. Any valid `StoreResponse` survives an encode → decode round-trip.
//! 3. Random bytes never cause a panic in the decoders (they return `Err`
//!    gracefully).

use proptest::prelude::*;
use termtask_proto::codec;
use termtask_proto::document::{DocumentId, TaskDocument, TaskFields, Timestamp};
use termtask_proto::store::{RequestId, StoreRequest, StoreResponse};
use uuid::Uuid;

// --- Arbitrary implementations for protocol types ---

/// Strategy for generating arbitrary `RequestId` values.
fn arb_request_id() -> impl Strategy<Value = RequestId> {
    any::<u128>().prop_map(|n| RequestId::from_uuid(Uuid::from_u128(n)))
}

/// Strategy for generating arbitrary `DocumentId` values.
fn arb_document_id() -> impl Strategy<Value = DocumentId> {
    "[a-zA-Z0-9-]{1,64}".prop_map(DocumentId::new)
}

/// Strategy for generating arbitrary `Timestamp` values.
fn arb_timestamp() -> impl Strategy<Value = Timestamp> {
    any::<u64>().prop_map(Timestamp::from_millis)
}

/// Strategy for generating arbitrary `TaskFields` values.
///
/// Names are unconstrained (including empty): the codec must round-trip
/// anything; validation is a separate concern.
fn arb_task_fields() -> impl Strategy<Value = TaskFields> {
    ("[^\x00]{0,256}", arb_timestamp()).prop_map(|(name, time)| TaskFields { name, time })
}

/// Strategy for generating arbitrary `TaskDocument` values.
fn arb_task_document() -> impl Strategy<Value = TaskDocument> {
    (arb_document_id(), arb_task_fields()).prop_map(|(id, fields)| TaskDocument { id, fields })
}

/// Strategy for generating arbitrary collection names.
fn arb_collection() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_-]{0,32}".prop_map(String::from)
}

/// Strategy for generating arbitrary `StoreRequest` values.
fn arb_store_request() -> impl Strategy<Value = StoreRequest> {
    prop_oneof![
        (arb_request_id(), arb_collection()).prop_map(|(request_id, collection)| {
            StoreRequest::ListAll {
                request_id,
                collection,
            }
        }),
        (arb_request_id(), arb_collection(), arb_task_fields()).prop_map(
            |(request_id, collection, fields)| StoreRequest::Create {
                request_id,
                collection,
                fields,
            }
        ),
        (
            arb_request_id(),
            arb_collection(),
            arb_document_id(),
            arb_task_fields()
        )
            .prop_map(|(request_id, collection, id, fields)| StoreRequest::Set {
                request_id,
                collection,
                id,
                fields,
            }),
        (arb_request_id(), arb_collection(), arb_document_id()).prop_map(
            |(request_id, collection, id)| StoreRequest::Delete {
                request_id,
                collection,
                id,
            }
        ),
    ]
}

/// Strategy for generating arbitrary `StoreResponse` values.
fn arb_store_response() -> impl Strategy<Value = StoreResponse> {
    prop_oneof![
        (
            arb_request_id(),
            prop::collection::vec(arb_task_document(), 0..16)
        )
            .prop_map(|(request_id, documents)| StoreResponse::Listed {
                request_id,
                documents,
            }),
        (arb_request_id(), arb_document_id()).prop_map(|(request_id, id)| {
            StoreResponse::Created { request_id, id }
        }),
        arb_request_id().prop_map(|request_id| StoreResponse::Applied { request_id }),
        (arb_request_id(), ".{0,128}").prop_map(|(request_id, reason)| StoreResponse::Failed {
            request_id,
            reason,
        }),
    ]
}

// --- Property tests ---

proptest! {
    /// Any valid StoreRequest survives an encode → decode round-trip.
    #[test]
    fn store_request_round_trip(request in arb_store_request()) {
        let bytes = codec::encode_request(&request).expect("encode should succeed");
        let decoded = codec::decode_request(&bytes).expect("decode should succeed");
        prop_assert_eq!(request, decoded);
    }

    /// Any valid StoreResponse survives an encode → decode round-trip.
    #[test]
    fn store_response_round_trip(response in arb_store_response()) {
        let bytes = codec::encode_response(&response).expect("encode should succeed");
        let decoded = codec::decode_response(&bytes).expect("decode should succeed");
        prop_assert_eq!(response, decoded);
    }

    /// Any valid TaskDocument survives a round-trip inside a Listed response.
    #[test]
    fn task_document_round_trip(document in arb_task_document()) {
        let response = StoreResponse::Listed {
            request_id: RequestId::new(),
            documents: vec![document],
        };
        let bytes = codec::encode_response(&response).expect("encode should succeed");
        let decoded = codec::decode_response(&bytes).expect("decode should succeed");
        prop_assert_eq!(response, decoded);
    }

    /// Random bytes never cause a panic when decoded as a request.
    #[test]
    fn random_bytes_decode_request_no_panic(bytes in prop::collection::vec(any::<u8>(), 0..512)) {
        // We don't care if it returns Ok or Err, just that it doesn't panic.
        let _ = codec::decode_request(&bytes);
    }

    /// Random bytes never cause a panic when decoded as a response.
    #[test]
    fn random_bytes_decode_response_no_panic(bytes in prop::collection::vec(any::<u8>(), 0..512)) {
        let _ = codec::decode_response(&bytes);
    }
}
