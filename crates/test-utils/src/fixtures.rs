// Copyright (c) 2025 cfn-lsp contributors
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Template fixtures.
//!
//! Each fixture that exists in both grammars carries the same semantic
//! document, so dual-grammar equivalence tests can compare classifications
//! pairwise.

/// Sample templates for testing
pub struct TemplateFixtures;

impl TemplateFixtures {
    // ===== Minimal single-resource templates =====

    /// One bucket, YAML
    pub const fn bucket_yaml() -> &'static str {
        "Resources:\n  MyBucket:\n    Type: AWS::S3::Bucket\n"
    }

    /// One bucket, JSON
    pub const fn bucket_json() -> &'static str {
        r#"{
  "Resources": {
    "MyBucket": {
      "Type": "AWS::S3::Bucket"
    }
  }
}"#
    }

    // ===== Intrinsic references =====

    /// Short-form `!Ref` argument, YAML
    pub const fn ref_yaml() -> &'static str {
        "Parameters:\n  Stage:\n    Type: String\nResources:\n  MyBucket:\n    Type: AWS::S3::Bucket\n    Properties:\n      BucketName: !Ref Stage\n"
    }

    /// Long-form `Ref` argument, JSON
    pub const fn ref_json() -> &'static str {
        r#"{
  "Parameters": {
    "Stage": {
      "Type": "String"
    }
  },
  "Resources": {
    "MyBucket": {
      "Type": "AWS::S3::Bucket",
      "Properties": {
        "BucketName": {"Ref": "Stage"}
      }
    }
  }
}"#
    }

    /// `!GetAtt` with a dotted attribute path, YAML
    pub const fn get_att_yaml() -> &'static str {
        "Resources:\n  Db:\n    Type: AWS::RDS::DBInstance\nOutputs:\n  Port:\n    Value: !GetAtt Db.Endpoint.Port\n"
    }

    /// `Fn::GetAtt` with the sequence argument form, JSON
    pub const fn get_att_json() -> &'static str {
        r#"{
  "Resources": {
    "Db": {
      "Type": "AWS::RDS::DBInstance"
    }
  },
  "Outputs": {
    "Port": {
      "Value": {"Fn::GetAtt": ["Db", "Endpoint.Port"]}
    }
  }
}"#
    }

    // ===== Multi-section templates =====

    /// Every entity-bearing section populated, YAML
    pub const fn full_template_yaml() -> &'static str {
        "\
AWSTemplateFormatVersion: '2010-09-09'
Description: fixture with every entity-bearing section
Parameters:
  Stage:
    Type: String
    Default: dev
Mappings:
  RegionMap:
    us-east-1:
      Ami: ami-123456
Conditions:
  IsProd: !Equals [!Ref Stage, prod]
Resources:
  MyBucket:
    Type: AWS::S3::Bucket
    Properties:
      BucketName: !Ref Stage
      Tags:
        - Key: stage
          Value: !Ref Stage
Outputs:
  BucketName:
    Value: !Ref MyBucket
"
    }

    /// Every entity-bearing section populated, JSON
    pub const fn full_template_json() -> &'static str {
        r#"{
  "AWSTemplateFormatVersion": "2010-09-09",
  "Description": "fixture with every entity-bearing section",
  "Parameters": {
    "Stage": {
      "Type": "String",
      "Default": "dev"
    }
  },
  "Mappings": {
    "RegionMap": {
      "us-east-1": {
        "Ami": "ami-123456"
      }
    }
  },
  "Conditions": {
    "IsProd": {"Fn::Equals": [{"Ref": "Stage"}, "prod"]}
  },
  "Resources": {
    "MyBucket": {
      "Type": "AWS::S3::Bucket",
      "Properties": {
        "BucketName": {"Ref": "Stage"},
        "Tags": [
          {"Key": "stage", "Value": {"Ref": "Stage"}}
        ]
      }
    }
  },
  "Outputs": {
    "BucketName": {
      "Value": {"Ref": "MyBucket"}
    }
  }
}"#
    }

    // ===== Degraded documents =====

    /// Mid-keystroke: a property key with nothing after the separator
    pub const fn dangling_key_yaml() -> &'static str {
        "Resources:\n  B:\n    Type: AWS::S3::Bucket\n    Properties:\n"
    }

    /// Mid-keystroke: an unterminated string value
    pub const fn dangling_quote_json() -> &'static str {
        r#"{"Resources": {"B": {"Type": "AWS::S3"#
    }
}
