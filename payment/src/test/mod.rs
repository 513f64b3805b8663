//! PaymentClient tests against a gateway that records raw requests.
