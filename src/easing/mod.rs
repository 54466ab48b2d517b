//! Easing curves: conversion to and from handles, presets, speed view and summaries.

pub mod apply;
pub mod curve;
pub mod info;
pub mod presets;
pub mod speed;
