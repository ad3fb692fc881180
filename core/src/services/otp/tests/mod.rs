//! Tests for the OTP lifecycle service


mod lifecycle_tests;
